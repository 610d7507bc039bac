//! Permission and timestamp propagation.

use crate::error::{Error, Result};
use filetime::{FileTime, set_file_times, set_symlink_file_times};
use std::fs::{self, Metadata};
use std::path::Path;

/// Copy mode bits and access/modification times described by `src_meta` onto
/// `dst`.
///
/// `src_meta` must be the source's `symlink_metadata` taken before its
/// content was read: reading advances the source access time, and the
/// destination gets the time from before the transfer.
///
/// For a symbolic link source only the link's own timestamps are set; mode
/// bits on links are not meaningfully settable and are left alone.
///
/// # Errors
///
/// Returns [`Error::Metadata`] if the destination cannot be updated.
pub fn sync_metadata(src_meta: &Metadata, dst: &Path) -> Result<()> {
    let metadata_err = |source: std::io::Error| Error::Metadata {
        path: dst.to_path_buf(),
        source,
    };

    let atime = FileTime::from_last_access_time(src_meta);
    let mtime = FileTime::from_last_modification_time(src_meta);

    if src_meta.file_type().is_symlink() {
        return set_symlink_file_times(dst, atime, mtime).map_err(metadata_err);
    }

    fs::set_permissions(dst, src_meta.permissions()).map_err(metadata_err)?;
    set_file_times(dst, atime, mtime).map_err(metadata_err)
}
