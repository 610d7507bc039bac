//! Quick-check comparison between a source and its destination.
//!
//! Decides whether a destination is already up to date without reading file
//! contents. Entries are inspected with `symlink_metadata`, so a symbolic
//! link is compared as itself rather than as the file it points to.

use crate::options::TransferPolicy;
use filetime::FileTime;
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;

/// Decide whether `src` has to be transferred to `dst` under `policy`.
///
/// | Policy | Transfer when |
/// |--------|---------------|
/// | `checksum` | always |
/// | `update` | `dst` missing, or source mtime strictly newer |
/// | default | `dst` missing, or mtime differs, or size differs |
///
/// A destination of a different kind than the source (a symlink or
/// directory in place of a file, and so on) always needs a transfer,
/// whatever its size and times.
///
/// A missing destination is never an error. Failing to stat the source is.
pub fn needs_transfer(src: &Path, dst: &Path, policy: &TransferPolicy) -> io::Result<bool> {
    if policy.checksum {
        return Ok(true);
    }

    let dst_meta = match fs::symlink_metadata(dst) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(e),
    };
    let src_meta = fs::symlink_metadata(src)?;

    if src_meta.file_type() != dst_meta.file_type() {
        return Ok(true);
    }

    if policy.update {
        Ok(is_source_newer(&src_meta, &dst_meta))
    } else {
        Ok(!is_up_to_date(&src_meta, &dst_meta))
    }
}

/// Check if source is strictly newer than destination based on mtime
#[inline]
pub fn is_source_newer(src_meta: &Metadata, dst_meta: &Metadata) -> bool {
    FileTime::from_last_modification_time(src_meta)
        > FileTime::from_last_modification_time(dst_meta)
}

/// Same size and same modification time
#[inline]
pub fn is_up_to_date(src_meta: &Metadata, dst_meta: &Metadata) -> bool {
    src_meta.len() == dst_meta.len()
        && FileTime::from_last_modification_time(src_meta)
            == FileTime::from_last_modification_time(dst_meta)
}
