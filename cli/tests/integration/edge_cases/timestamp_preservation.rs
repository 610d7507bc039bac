//! Timestamp and permission propagation integration tests for tsync CLI.
//!
//! These tests verify that after a transfer the destination carries the
//! source's modification time, access time and mode bits, and that skipped
//! files are left untouched.

use crate::common::{TestFixture, mtime_secs, set_mtime};
use assert_cmd::cargo::cargo_bin_cmd;
use filetime::{FileTime, set_file_times};
use std::fs;

/// Test that modification time is preserved during copy.
#[test]
fn test_modification_time_preserved() {
    let fx = TestFixture::new();
    let src = fx.write_src("test.txt", "content");
    set_mtime(&src, 1_600_000_000);

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg(&src).arg(fx.dst.path()).assert().success();

    assert_eq!(mtime_secs(&fx.dst_path("test.txt")), 1_600_000_000);
}

#[test]
fn test_access_time_preserved() {
    let fx = TestFixture::new();
    let src = fx.write_src("test.txt", "content");
    set_file_times(
        &src,
        FileTime::from_unix_time(1_500_000_000, 0),
        FileTime::from_unix_time(1_600_000_000, 0),
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg(&src).arg(fx.dst.path()).assert().success();

    let meta = fs::metadata(fx.dst_path("test.txt")).unwrap();
    assert_eq!(
        FileTime::from_last_access_time(&meta).unix_seconds(),
        1_500_000_000
    );
}

/// A patched destination gets the source time too.
#[test]
fn test_timestamp_on_patch() {
    let fx = TestFixture::new();
    let src = fx.write_src("test.txt", "longer new content");
    let dst = fx.write_dst("test.txt", "old");
    set_mtime(&src, 1_650_000_000);

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg(&src).arg(&dst).assert().success();

    fx.assert_file_content(&dst, "longer new content");
    assert_eq!(mtime_secs(&dst), 1_650_000_000);
}

#[test]
fn test_timestamp_not_changed_on_skip() {
    let fx = TestFixture::new();
    let src = fx.write_src("test.txt", "old source");
    let dst = fx.write_dst("test.txt", "newer dst");
    set_mtime(&src, 1_500_000_000);
    set_mtime(&dst, 1_700_000_000);

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg("-u").arg(&src).arg(&dst).assert().success();

    fx.assert_file_content(&dst, "newer dst");
    assert_eq!(mtime_secs(&dst), 1_700_000_000);
}

#[test]
fn test_nested_file_timestamps() {
    let fx = TestFixture::new();
    let deep = fx.write_src("tree/a/b/deep.txt", "deep");
    set_mtime(&deep, 1_234_567_890);

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg("-r")
        .arg(fx.src_path("tree"))
        .arg(fx.dst.path())
        .assert()
        .success();

    assert_eq!(mtime_secs(&fx.dst_path("tree/a/b/deep.txt")), 1_234_567_890);
}

#[cfg(unix)]
#[test]
fn test_mode_bits_preserved() {
    use std::os::unix::fs::PermissionsExt;

    let fx = TestFixture::new();
    let script = fx.write_src("run.sh", "#!/bin/sh\necho hi\n");
    fs::set_permissions(&script, fs::Permissions::from_mode(0o750)).unwrap();
    let dst = fx.write_dst("run.sh", "#!/bin/sh\n");
    fs::set_permissions(&dst, fs::Permissions::from_mode(0o644)).unwrap();

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg(&script).arg(fx.dst.path()).assert().success();

    let mode = fs::metadata(&dst).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o750);
}

#[cfg(unix)]
#[test]
fn test_symlink_times_do_not_touch_target() {
    use std::os::unix::fs::symlink;

    let fx = TestFixture::new();
    let target = fx.write_dst("target.txt", "shared target");
    set_mtime(&target, 1_400_000_000);
    symlink(&target, fx.src_path("link")).unwrap();

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg(fx.src_path("link"))
        .arg(fx.dst.path())
        .assert()
        .success();

    assert!(fs::symlink_metadata(fx.dst_path("link")).unwrap().file_type().is_symlink());
    assert_eq!(mtime_secs(&target), 1_400_000_000);
}
