//! File type conflict integration tests for tsync CLI.
//!
//! These tests verify what happens when the destination already holds an
//! entry of a different type than the source.

use crate::common::{TestFixture, with_slash};
use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;

/// A file copied onto an existing directory lands inside it.
#[test]
fn test_file_to_existing_directory() {
    let fx = TestFixture::new();
    let src = fx.write_src("file.txt", "content");
    fs::create_dir(fx.dst_path("target_dir")).unwrap();

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg(&src)
        .arg(fx.dst_path("target_dir"))
        .assert()
        .success();

    fx.assert_file_content(&fx.dst_path("target_dir/file.txt"), "content");
}

/// An empty directory in the way of a file is replaced.
#[test]
fn test_file_replaces_empty_directory() {
    let fx = TestFixture::new();
    fx.write_src("tree/name", "now a file");
    fs::create_dir(fx.dst_path("name")).unwrap();

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg("-r")
        .arg(with_slash(&fx.src_path("tree")))
        .arg(fx.dst.path())
        .assert()
        .success();

    fx.assert_file_content(&fx.dst_path("name"), "now a file");
}

/// A directory merges into an existing destination directory.
#[test]
fn test_directory_into_existing_directory_merges() {
    let fx = TestFixture::new();
    fx.write_src("tree/new.txt", "new");
    fx.write_dst("tree/existing.txt", "existing");

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg("-r")
        .arg(fx.src_path("tree"))
        .arg(fx.dst.path())
        .assert()
        .success();

    fx.assert_file_content(&fx.dst_path("tree/new.txt"), "new");
    fx.assert_file_content(&fx.dst_path("tree/existing.txt"), "existing");
}

/// Synchronizing a file onto itself changes nothing.
#[test]
fn test_copy_to_self() {
    let fx = TestFixture::new();
    let src = fx.write_src("self.txt", "keep me");

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg("-c").arg(&src).arg(&src).assert().success();

    fx.assert_file_content(&src, "keep me");
}

#[cfg(unix)]
mod unix_tests {
    use super::*;
    use std::os::unix::fs::symlink;

    /// A destination symlink to a directory is followed as a directory
    /// argument, as with any existing directory.
    #[test]
    fn test_copy_to_symlink_pointing_to_directory() {
        let fx = TestFixture::new();
        let src = fx.write_src("file.txt", "content");
        fs::create_dir(fx.dst_path("real_dir")).unwrap();
        symlink(fx.dst_path("real_dir"), fx.dst_path("link_dir")).unwrap();

        let mut cmd = cargo_bin_cmd!("tsync");
        cmd.arg(&src)
            .arg(fx.dst_path("link_dir"))
            .assert()
            .success();

        fx.assert_file_content(&fx.dst_path("real_dir/file.txt"), "content");
    }

    #[test]
    fn test_copy_to_broken_symlink() {
        let fx = TestFixture::new();
        let src = fx.write_src("file.txt", "content");
        symlink("nowhere", fx.dst_path("broken")).unwrap();

        let mut cmd = cargo_bin_cmd!("tsync");
        cmd.arg(&src)
            .arg(fx.dst_path("broken"))
            .assert()
            .success();

        let dst = fx.dst_path("broken");
        assert!(fs::symlink_metadata(&dst).unwrap().is_file());
        fx.assert_file_content(&dst, "content");
        assert!(!fx.dst_path("nowhere").exists());
    }

    /// FIFOs in a tree are skipped with a warning, the rest is copied.
    #[test]
    fn test_fifo_is_skipped() {
        let fx = TestFixture::new();
        fx.write_src("tree/regular.txt", "regular");
        let fifo = fx.src_path("tree/pipe");
        let c_path = std::ffi::CString::new(fifo.to_str().unwrap()).unwrap();
        let rc = unsafe { libc::mkfifo(c_path.as_ptr(), 0o644) };
        assert_eq!(rc, 0, "mkfifo failed");

        let mut cmd = cargo_bin_cmd!("tsync");
        cmd.arg("-r")
            .arg(fx.src_path("tree"))
            .arg(fx.dst.path())
            .assert()
            .success()
            .stderr(predicates::str::contains("skipping non-regular file"));

        fx.assert_file_content(&fx.dst_path("tree/regular.txt"), "regular");
        assert!(fs::symlink_metadata(fx.dst_path("tree/pipe")).is_err());
    }
}
