//! Symbolic and hard link detection and replication.
//!
//! Links are replicated as links: a symbolic link becomes a new symbolic link
//! with the identical target text (never resolved), and a file with more than
//! one link becomes another name for the same inode. Link replication takes
//! precedence over content transfer.

use crate::error::{Error, Result};
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;

/// Which link relationship a source carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// A symbolic link, replicated with the same target text
    Symbolic,
    /// A regular file with a link count above one, replicated as a hard link
    Hard,
}

/// Helper to check if path is a symlink without following it
#[inline]
pub fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// Whether the entry at `path` has more than one hard link.
///
/// Symbolic links are inspected themselves, not their targets.
pub fn is_hard_linked(path: &Path) -> io::Result<bool> {
    fs::symlink_metadata(path).map(|m| link_count(&m) > 1)
}

#[cfg(unix)]
fn link_count(meta: &Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    meta.nlink()
}

#[cfg(not(unix))]
fn link_count(_meta: &Metadata) -> u64 {
    1
}

/// Classify an entry from its (non-following) metadata.
pub fn classify(meta: &Metadata) -> Option<LinkKind> {
    let ft = meta.file_type();
    if ft.is_symlink() {
        Some(LinkKind::Symbolic)
    } else if ft.is_file() && link_count(meta) > 1 {
        Some(LinkKind::Hard)
    } else {
        None
    }
}

/// Replace `dst` with a link mirroring `src`.
///
/// Whatever exists at `dst` (a file, a link or an empty directory) is removed
/// first; links are never updated in place. Sources that are neither
/// symbolic nor hard-linked are hard-linked as well, which is what the
/// transfer engine relies on for its permission fallback.
///
/// # Errors
///
/// Returns [`Error::Link`] if the old destination cannot be removed, the
/// symlink target cannot be read, or the link cannot be created (for example
/// a hard link across filesystems).
pub fn replicate_link(src: &Path, dst: &Path) -> Result<LinkKind> {
    let link_err = |source: io::Error| Error::Link {
        path: dst.to_path_buf(),
        source,
    };

    let src_meta = fs::symlink_metadata(src).map_err(link_err)?;
    let kind = classify(&src_meta).unwrap_or(LinkKind::Hard);

    if let Ok(dst_meta) = fs::symlink_metadata(dst) {
        remove_existing(dst, &dst_meta).map_err(link_err)?;
    }

    match kind {
        LinkKind::Symbolic => {
            let target = fs::read_link(src).map_err(link_err)?;
            symlink(&target, dst).map_err(link_err)?;
        }
        LinkKind::Hard => {
            fs::hard_link(src, dst).map_err(link_err)?;
        }
    }

    Ok(kind)
}

/// Remove an existing file, symlink, or empty directory at the given path
///
/// Used when the destination of a file or link is taken by an entry of
/// another kind. An empty directory in the way is deleted, so a file child
/// `name` replaces an empty destination directory `name` instead of landing
/// at `name/name`. Non-empty directories are left alone and reported as an
/// error rather than deleted wholesale.
#[inline]
pub(crate) fn remove_existing(path: &Path, meta: &Metadata) -> io::Result<()> {
    if meta.file_type().is_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

#[cfg(unix)]
pub(crate) use std::os::unix::fs::symlink;

#[cfg(not(unix))]
pub(crate) fn symlink(_target: &Path, _link: &Path) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "Symlinks not supported on this platform",
    ))
}
