//! Depth-first directory walk.
//!
//! Each directory is handled in one pass: make sure the destination directory
//! exists, list the children without following links, synchronize the files
//! (symbolic links included, whatever they point to), then descend into the
//! subdirectories. Children are visited in name order.

use super::{EntryKind, SyncReport, dispatch, source_error};
use crate::error::Error;
use crate::options::TransferPolicy;
use crate::utils::path::{
    as_dir_path, destination_path, ends_with_separator, ensure_parent_dir, source_base_name,
};
use std::ffi::OsString;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};

/// Resolve the directory a top-level directory source is synchronized into.
///
/// `dst` is created if missing. A source written with a trailing separator
/// (`dir/`) merges its contents straight into `dst`; otherwise the source
/// directory is recreated by name inside `dst`.
pub(crate) fn entry_destination(
    src: &Path,
    dst: &Path,
    report: &mut SyncReport,
) -> Option<PathBuf> {
    if !ensure_dir(dst, report) {
        return None;
    }
    if ends_with_separator(src) {
        Some(dst.to_path_buf())
    } else {
        Some(destination_path(dst, source_base_name(src)))
    }
}

/// Synchronize the contents of directory `src` into directory `dst`.
pub(crate) fn sync_dir(src: &Path, dst: &Path, policy: &TransferPolicy, report: &mut SyncReport) {
    #[cfg(feature = "tracing")]
    tracing::trace!(src = %src.display(), dst = %dst.display(), "entering directory");

    if !ensure_dir(dst, report) {
        return;
    }

    let Some(children) = read_children(src, report) else {
        return;
    };

    let (dirs, files): (Vec<_>, Vec<_>) = children
        .into_iter()
        .partition(|(_, meta)| EntryKind::from(meta.file_type()) == EntryKind::Directory);

    for (name, meta) in files.iter().chain(dirs.iter()) {
        dispatch(&src.join(name), &dst.join(name), meta, policy, report);
    }
}

/// Create `dst` as a directory if it does not exist yet.
///
/// Returns false (with the error recorded) when it cannot be created.
fn ensure_dir(dst: &Path, report: &mut SyncReport) -> bool {
    match ensure_parent_dir(&as_dir_path(dst)) {
        Ok(created) => {
            if created {
                #[cfg(feature = "tracing")]
                tracing::trace!(dir = %dst.display(), "created directory");
                report.stats.dirs_created += 1;
            }
            true
        }
        Err(source) => {
            report.fail(Error::CreateDir {
                path: dst.to_path_buf(),
                source,
            });
            false
        }
    }
}

/// List the children of `src` with their (non-following) metadata, sorted by
/// name. Children that cannot be inspected are reported and left out.
fn read_children(src: &Path, report: &mut SyncReport) -> Option<Vec<(OsString, Metadata)>> {
    let entries = match fs::read_dir(src) {
        Ok(entries) => entries,
        Err(e) => {
            report.fail(match source_error(src, e) {
                Error::Stat { path, source } => Error::ReadDir { path, source },
                other => other,
            });
            return None;
        }
    };

    let mut children = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                report.fail(Error::ReadDir {
                    path: src.to_path_buf(),
                    source,
                });
                continue;
            }
        };
        match entry.metadata() {
            Ok(meta) => children.push((entry.file_name(), meta)),
            Err(e) => report.fail(source_error(&entry.path(), e)),
        }
    }

    children.sort_by(|a, b| a.0.cmp(&b.0));
    Some(children)
}
