//! The synchronization engine.
//!
//! Each source argument goes through [`sync_path`]: the destination argument
//! is resolved once, then [`sync_entry`] dispatches on the kind of the source.
//! Files and symbolic links take the single-file path ([`sync_file`]):
//!
//! 1. quick check ([`needs_transfer`]), skip when up to date
//! 2. link replication when the source is a symbolic or hard link
//! 3. otherwise content transfer (fresh copy or in-place patch)
//! 4. mode and timestamps copied from the source
//!
//! Directories are walked depth-first when recursion is enabled. A failing
//! entry is recorded in the [`SyncReport`] and the run moves on to the next
//! one.

mod compare;
mod link;
mod metadata;
mod report;
mod transfer;
mod walk;

pub use compare::{is_source_newer, is_up_to_date, needs_transfer};
pub use link::{LinkKind, classify, is_hard_linked, is_symlink, replicate_link};
pub use metadata::sync_metadata;
pub use report::{SyncReport, SyncStats};
pub use transfer::transfer_content;

use crate::error::{Error, Result};
use crate::options::TransferPolicy;
use crate::utils::path::{destination_path, display_path, ensure_parent_dir, source_base_name};
use std::fmt;
use std::fs::{self, File, FileType, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Kind of a filesystem entry, as seen without following links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Symbolic link, whatever it points to
    Symlink,
    /// Socket, FIFO, device node
    Other,
}

impl From<FileType> for EntryKind {
    fn from(ft: FileType) -> Self {
        if ft.is_symlink() {
            Self::Symlink
        } else if ft.is_dir() {
            Self::Directory
        } else if ft.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

/// What happened to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// Destination already up to date
    Skipped,
    /// Destination written from scratch
    Copied {
        /// Bytes written
        bytes: u64,
    },
    /// Destination patched in place
    Patched {
        /// Bytes rewritten or appended
        bytes: u64,
    },
    /// Link relationship replicated
    Linked(LinkKind),
    /// Destination was not writable and now is a hard link to the source
    LinkFallback,
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped => write!(f, "skipped"),
            Self::Copied { bytes } => write!(f, "copied ({bytes} bytes)"),
            Self::Patched { bytes } => write!(f, "patched ({bytes} bytes)"),
            Self::Linked(LinkKind::Symbolic) => write!(f, "linked (symbolic)"),
            Self::Linked(LinkKind::Hard) => write!(f, "linked (hard)"),
            Self::LinkFallback => write!(f, "linked (fallback)"),
        }
    }
}

/// Synchronize one source file or symbolic link to a resolved destination.
///
/// `dst` is the final path of the file, not a directory to place it into.
///
/// # Errors
///
/// Returns [`Error::Stat`] if the entries cannot be inspected and the
/// transfer, link, or metadata error of whichever step failed.
pub fn sync_file(src: &Path, dst: &Path, policy: &TransferPolicy) -> Result<FileAction> {
    let stat_err = |source: io::Error| Error::Stat {
        path: src.to_path_buf(),
        source,
    };

    if !needs_transfer(src, dst, policy).map_err(stat_err)? {
        log_action(src, dst, FileAction::Skipped);
        return Ok(FileAction::Skipped);
    }

    let src_meta = fs::symlink_metadata(src).map_err(stat_err)?;

    // Already the same inode (hard link in place, or src == dst)
    if is_same_entry(&src_meta, dst) {
        log_action(src, dst, FileAction::Skipped);
        return Ok(FileAction::Skipped);
    }

    let action = match classify(&src_meta) {
        Some(_) => FileAction::Linked(replicate_link(src, dst)?),
        None => transfer_content(src, dst)?,
    };

    if action == FileAction::LinkFallback {
        policy.warn(&format!(
            "{} is not writable, replaced by a hard link to {}",
            dst.display(),
            src.display()
        ));
    }

    sync_metadata(&src_meta, dst)?;
    log_action(src, dst, action);
    Ok(action)
}

/// Synchronize `src` onto the already resolved destination `dst`.
///
/// Dispatches on the kind of `src`: directories are walked (or skipped when
/// recursion is off), files and symbolic links go through [`sync_file`],
/// anything else is skipped with a warning. Failures land in `report`.
pub fn sync_entry(src: &Path, dst: &Path, policy: &TransferPolicy, report: &mut SyncReport) {
    match fs::symlink_metadata(src) {
        Ok(meta) => dispatch(src, dst, &meta, policy, report),
        Err(e) => report.fail(source_error(src, e)),
    }
}

pub(crate) fn dispatch(
    src: &Path,
    dst: &Path,
    meta: &Metadata,
    policy: &TransferPolicy,
    report: &mut SyncReport,
) {
    match EntryKind::from(meta.file_type()) {
        EntryKind::Directory => {
            if policy.recursive {
                walk::sync_dir(src, dst, policy, report);
            } else {
                policy.warn(&format!("skipping directory {}", src.display()));
                report.stats.dirs_skipped += 1;
            }
        }
        EntryKind::File | EntryKind::Symlink => {
            if let Err(e) = probe_readable(src, meta) {
                report.fail(e);
                return;
            }
            match sync_file(src, dst, policy) {
                Ok(action) => report.stats.record(action),
                Err(e) => report.fail(e),
            }
        }
        EntryKind::Other => {
            policy.warn(&format!("skipping non-regular file {}", src.display()));
        }
    }
}

/// Synchronize one source argument against a destination argument.
///
/// A missing source is reported as [`Error::SourceNotFound`] and nothing is
/// created at the destination. For a file source the destination's parent
/// directory is created if needed and the file lands at
/// `destination_path(dst, source_base_name(src))`. For a directory source
/// with recursion enabled `dst` is ensured as a directory first and, unless
/// `src` ends with a separator, the directory is recreated inside it.
///
/// # Example
///
/// ```no_run
/// use tinysync::{TransferPolicy, sync_path};
/// use std::path::Path;
///
/// let policy = TransferPolicy::default().with_update();
/// let report = sync_path(Path::new("notes.txt"), Path::new("backup/"), &policy);
/// for error in &report.errors {
///     eprintln!("{error}");
/// }
/// ```
pub fn sync_path(src: &Path, dst: &Path, policy: &TransferPolicy) -> SyncReport {
    let start_time = Instant::now();
    let mut report = SyncReport::default();

    match fs::symlink_metadata(src) {
        Ok(meta) => {
            if let Some(target) = resolve_target(src, dst, &meta, policy, &mut report) {
                dispatch(src, &target, &meta, policy, &mut report);
            }
        }
        Err(e) => report.fail(source_error(src, e)),
    }

    report.stats.duration = start_time.elapsed();
    report
}

/// Synchronize every source into `dst`, in order.
///
/// Each source is processed to completion before the next one starts; a
/// failing source does not stop the others.
pub fn sync_all<P: AsRef<Path>>(sources: &[P], dst: &Path, policy: &TransferPolicy) -> SyncReport {
    let mut report = SyncReport::default();
    for src in sources {
        report.merge(sync_path(src.as_ref(), dst, policy));
    }
    report
}

/// Work out where a source argument lands, creating directories on the way.
fn resolve_target(
    src: &Path,
    dst: &Path,
    meta: &Metadata,
    policy: &TransferPolicy,
    report: &mut SyncReport,
) -> Option<PathBuf> {
    match EntryKind::from(meta.file_type()) {
        EntryKind::Directory if policy.recursive => walk::entry_destination(src, dst, report),
        EntryKind::File | EntryKind::Symlink => {
            match ensure_parent_dir(dst) {
                Ok(created) => {
                    if created {
                        report.stats.dirs_created += 1;
                    }
                }
                Err(source) => {
                    report.fail(Error::CreateDir {
                        path: dst.to_path_buf(),
                        source,
                    });
                    return None;
                }
            }
            Some(destination_path(dst, source_base_name(src)))
        }
        EntryKind::Directory | EntryKind::Other => Some(dst.to_path_buf()),
    }
}

/// Fail early on a regular file the current user cannot read.
fn probe_readable(src: &Path, meta: &Metadata) -> Result<()> {
    if !meta.is_file() {
        return Ok(());
    }
    File::open(src).map(drop).map_err(|e| source_error(src, e))
}

/// Map a failure to access a source entry onto the user-facing error.
pub(crate) fn source_error(src: &Path, e: io::Error) -> Error {
    match e.kind() {
        io::ErrorKind::NotFound => Error::SourceNotFound(display_path(src)),
        io::ErrorKind::PermissionDenied => Error::PermissionDenied(display_path(src)),
        _ => Error::Stat {
            path: src.to_path_buf(),
            source: e,
        },
    }
}

#[cfg(unix)]
fn is_same_entry(src_meta: &Metadata, dst: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    fs::symlink_metadata(dst)
        .map(|d| d.dev() == src_meta.dev() && d.ino() == src_meta.ino())
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_same_entry(_src_meta: &Metadata, _dst: &Path) -> bool {
    false
}

#[cfg(feature = "tracing")]
fn log_action(src: &Path, dst: &Path, action: FileAction) {
    tracing::debug!(src = %src.display(), dst = %dst.display(), "{action}");
}

#[cfg(not(feature = "tracing"))]
fn log_action(_src: &Path, _dst: &Path, _action: FileAction) {}
