//! Destination path resolution.
//!
//! A destination argument means either "place into this directory" or "write
//! this file" depending on whether it already exists as a directory, and a
//! trailing separator on a path is significant (`dir/` names the contents of
//! `dir`). [`Path`] normalizes trailing separators away in most of its API, so
//! this module inspects the raw path bytes where the distinction matters.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf, is_separator};

/// Whether the path text contains at least one separator.
fn has_separator(path: &Path) -> bool {
    path.as_os_str()
        .as_encoded_bytes()
        .iter()
        .any(|&b| is_separator(b as char))
}

/// Whether the path text ends with a separator (`dir/`).
pub fn ends_with_separator(path: &Path) -> bool {
    path.as_os_str()
        .as_encoded_bytes()
        .last()
        .is_some_and(|&b| is_separator(b as char))
}

/// Return `path` with a trailing separator, marking it directory-shaped.
pub fn as_dir_path(path: &Path) -> PathBuf {
    if ends_with_separator(path) {
        return path.to_path_buf();
    }
    let mut raw = path.as_os_str().to_os_string();
    raw.push(MAIN_SEPARATOR_STR);
    PathBuf::from(raw)
}

/// The name a source gets when it is placed inside a destination directory.
///
/// Paths with a separator yield their final component; anything else (a bare
/// name, `.`, `..`) is returned unchanged.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use tinysync::utils::path::source_base_name;
///
/// assert_eq!(source_base_name(Path::new("docs/a.txt")), "a.txt");
/// assert_eq!(source_base_name(Path::new("a.txt")), "a.txt");
/// ```
pub fn source_base_name(path: &Path) -> &OsStr {
    if !has_separator(path) {
        return path.as_os_str();
    }
    path.file_name().unwrap_or(path.as_os_str())
}

/// Resolve where `filename` lands for the destination argument `dst`.
///
/// An existing directory receives the file inside it; any other `dst` is
/// taken literally as the target file path.
pub fn destination_path(dst: &Path, filename: impl AsRef<Path>) -> PathBuf {
    if dst.is_dir() {
        dst.join(filename)
    } else {
        dst.to_path_buf()
    }
}

/// Create the directory a write to `dst` needs, one level deep.
///
/// Nothing happens when `dst` exists or has no separator. A directory-shaped
/// `dst` (trailing separator) is created itself; otherwise its parent is
/// created if missing. Creation is never recursive: when more than one level
/// is missing the underlying `NotFound` error is returned.
///
/// Returns whether a directory was created.
pub fn ensure_parent_dir(dst: &Path) -> io::Result<bool> {
    if dst.symlink_metadata().is_ok() || !has_separator(dst) {
        return Ok(false);
    }

    let target = if ends_with_separator(dst) {
        dst
    } else {
        match dst.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => return Ok(false),
        }
    };

    if target.symlink_metadata().is_ok() {
        return Ok(false);
    }

    create_dir_single(target)?;
    Ok(true)
}

#[cfg(unix)]
fn create_dir_single(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().mode(0o755).create(path)
}

#[cfg(not(unix))]
fn create_dir_single(path: &Path) -> io::Result<()> {
    fs::create_dir(path)
}

/// Absolute form of `path` for user-facing messages.
///
/// Falls back to the path as given when the working directory is unknown.
pub fn display_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
