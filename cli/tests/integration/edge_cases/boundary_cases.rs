//! Boundary cases integration tests for tsync CLI.
//!
//! These tests verify behavior at edge cases and boundary conditions:
//! - Empty files
//! - Files larger than the patch buffer
//! - Files with special characters in names
//! - Deep directory nesting
//! - Many files in a single directory
//! - Binary content

use crate::common::{TestFixture, set_mtime, with_slash};
use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;

// =============================================================================
// Empty File Tests
// =============================================================================

#[test]
fn test_copy_empty_file() {
    let fx = TestFixture::new();
    let src = fx.write_src("empty.txt", "");

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg(&src).arg(fx.dst.path()).assert().success();

    let dst = fx.dst_path("empty.txt");
    assert!(dst.is_file());
    assert_eq!(fs::metadata(&dst).unwrap().len(), 0);
}

/// An empty source truncates a non-empty destination.
#[test]
fn test_empty_source_truncates_destination() {
    let fx = TestFixture::new();
    let src = fx.write_src("file.txt", "");
    let dst = fx.write_dst("file.txt", "something");

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg(&src).arg(&dst).assert().success();

    assert_eq!(fs::metadata(&dst).unwrap().len(), 0);
}

// =============================================================================
// Large File Tests
// =============================================================================

#[test]
fn test_copy_file_larger_than_buffer() {
    let fx = TestFixture::new();
    let content: Vec<u8> = (0..(200 * 1024)).map(|i| (i % 251) as u8).collect();
    let src = fx.src_path("large.bin");
    fs::write(&src, &content).unwrap();

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg(&src).arg(fx.dst.path()).assert().success();

    assert_eq!(fs::read(fx.dst_path("large.bin")).unwrap(), content);
}

/// Scattered edits in a large file are patched in place.
#[test]
fn test_patch_large_file_with_scattered_edits() {
    let fx = TestFixture::new();
    let original: Vec<u8> = (0..(300 * 1024)).map(|i| (i % 199) as u8).collect();
    let mut edited = original.clone();
    for offset in [10, 70_000, 140_000, 299_000] {
        edited[offset] = edited[offset].wrapping_add(1);
    }
    edited.extend_from_slice(b"appended tail");

    let src = fx.src_path("data.bin");
    let dst = fx.dst_path("data.bin");
    fs::write(&src, &edited).unwrap();
    fs::write(&dst, &original).unwrap();

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg(&src).arg(&dst).assert().success();

    assert_eq!(fs::read(&dst).unwrap(), edited);
}

// =============================================================================
// Filename Tests
// =============================================================================

#[test]
fn test_filename_with_spaces() {
    let fx = TestFixture::new();
    fx.write_src("dir with spaces/file with spaces.txt", "spaced");

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg("-r")
        .arg(fx.src_path("dir with spaces"))
        .arg(fx.dst.path())
        .assert()
        .success();

    fx.assert_file_content(
        &fx.dst_path("dir with spaces/file with spaces.txt"),
        "spaced",
    );
}

#[test]
fn test_filename_with_special_chars() {
    let fx = TestFixture::new();
    let names = [
        "file-with-dashes.txt",
        "file_with_underscores.txt",
        "file.multiple.dots.txt",
        "file'quote.txt",
        "file(parens).txt",
        "file&amp.txt",
    ];
    for name in names {
        fx.write_src(&format!("tree/{name}"), name);
    }

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg("-r")
        .arg(with_slash(&fx.src_path("tree")))
        .arg(fx.dst.path())
        .assert()
        .success();

    for name in names {
        fx.assert_file_content(&fx.dst_path(name), name);
    }
}

#[test]
fn test_filename_with_unicode() {
    let fx = TestFixture::new();
    let src = fx.write_src("日本語ファイル.txt", "unicode content");

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg(&src).arg(fx.dst.path()).assert().success();

    fx.assert_file_content(&fx.dst_path("日本語ファイル.txt"), "unicode content");
}

#[test]
fn test_hidden_files() {
    let fx = TestFixture::new();
    fx.write_src("tree/.hidden", "hidden");
    fx.write_src("tree/.config/settings", "settings");

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg("-r")
        .arg(fx.src_path("tree"))
        .arg(fx.dst.path())
        .assert()
        .success();

    fx.assert_file_content(&fx.dst_path("tree/.hidden"), "hidden");
    fx.assert_file_content(&fx.dst_path("tree/.config/settings"), "settings");
}

// =============================================================================
// Structure Tests
// =============================================================================

#[test]
fn test_deep_directory_nesting() {
    let fx = TestFixture::new();
    let rel: String = (0..30).map(|i| format!("d{i}/")).collect();
    fx.write_src(&format!("{rel}leaf.txt"), "deep");

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg("-r")
        .arg(with_slash(fx.src.path()))
        .arg(fx.dst.path())
        .assert()
        .success();

    fx.assert_file_content(&fx.dst_path(&format!("{rel}leaf.txt")), "deep");
}

#[test]
fn test_many_files_in_directory() {
    let fx = TestFixture::new();
    for i in 0..300 {
        fx.write_src(&format!("tree/file{i:04}.txt"), &i.to_string());
    }

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg("-r")
        .arg(fx.src_path("tree"))
        .arg(fx.dst.path())
        .assert()
        .success();

    assert_eq!(fx.count_files_recursive(&fx.dst_path("tree")), 300);
    fx.assert_file_content(&fx.dst_path("tree/file0299.txt"), "299");
}

#[test]
fn test_empty_directories_are_created() {
    let fx = TestFixture::new();
    fs::create_dir_all(fx.src_path("tree/empty/also_empty")).unwrap();

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg("-r")
        .arg(fx.src_path("tree"))
        .arg(fx.dst.path())
        .assert()
        .success();

    assert!(fx.dst_path("tree/empty/also_empty").is_dir());
}

// =============================================================================
// Content Tests
// =============================================================================

#[test]
fn test_binary_content_all_bytes() {
    let fx = TestFixture::new();
    let content: Vec<u8> = (0..=255u8).collect();
    let src = fx.src_path("binary.bin");
    fs::write(&src, &content).unwrap();

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg(&src).arg(fx.dst.path()).assert().success();

    assert_eq!(fs::read(fx.dst_path("binary.bin")).unwrap(), content);
}

/// Same size and mtime but different bytes is invisible to the quick check.
#[test]
fn test_same_size_and_mtime_content_change_is_skipped() {
    let fx = TestFixture::new();
    let src = fx.write_src("file.txt", "AAAA");
    let dst = fx.write_dst("file.txt", "BBBB");
    set_mtime(&src, 1_600_000_000);
    set_mtime(&dst, 1_600_000_000);

    let mut cmd = cargo_bin_cmd!("tsync");
    cmd.arg(&src).arg(&dst).assert().success();

    fx.assert_file_content(&dst, "BBBB");
}
