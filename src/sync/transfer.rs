//! Content transfer: fresh copies and in-place byte patching.
//!
//! A destination that is missing, not a regular file, or longer than the
//! source is replaced by a fresh copy written through a temporary file. A
//! regular destination that is no longer than the source is patched in place:
//! only bytes that differ at the same offset are rewritten and the remainder
//! of the source is appended.
//!
//! The in-place patch is offset-aligned. It works well after small edits that
//! keep the layout of a file (appends, overwrites), but an insertion near the
//! start of a file shifts every following byte and rewrites almost all of
//! it. There is no rolling checksum or block matching.

use super::FileAction;
use super::link::{remove_existing, replicate_link};
use crate::error::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::ops::Range;
use std::path::Path;

/// Buffer size for the in-place comparison.
const PATCH_BLOCK_SIZE: usize = 64 * 1024;

/// Bring the content of `dst` in line with `src`.
///
/// A symlink or an empty directory at `dst` is removed and replaced by a
/// fresh copy; a non-empty directory is never deleted.
///
/// # Errors
///
/// Returns [`Error::Transfer`] for read/write failures, [`Error::TempFile`] or
/// [`Error::Persist`] when a fresh copy cannot be staged, and [`Error::Link`]
/// when the permission fallback fails. A destination that cannot be opened
/// for writing is not an error: it is replaced by a hard link to the source
/// and [`FileAction::LinkFallback`] is returned.
pub fn transfer_content(src: &Path, dst: &Path) -> Result<FileAction> {
    let transfer_err = |source: io::Error| Error::Transfer {
        path: dst.to_path_buf(),
        source,
    };

    let src_len = fs::metadata(src).map_err(transfer_err)?.len();

    let dst_meta = match fs::symlink_metadata(dst) {
        Ok(meta) => Some(meta),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(transfer_err(e)),
    };

    match dst_meta {
        Some(meta) if meta.is_file() && src_len >= meta.len() => {
            patch_in_place(src, dst, meta.len())
        }
        Some(meta) => {
            remove_existing(dst, &meta).map_err(transfer_err)?;
            fresh_copy(src, dst, src_len)
        }
        None => fresh_copy(src, dst, src_len),
    }
}

/// Write the whole source as a new file at `dst`.
fn fresh_copy(src: &Path, dst: &Path, len: u64) -> Result<FileAction> {
    let src_file = File::open(src).map_err(|source| Error::Transfer {
        path: dst.to_path_buf(),
        source,
    })?;

    let dst_parent = match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp_file =
        tempfile::NamedTempFile::new_in(dst_parent).map_err(|source| Error::TempFile {
            path: dst_parent.to_path_buf(),
            source,
        })?;

    let bytes = copy_contents(&src_file, temp_file.as_file(), len).map_err(|source| {
        Error::Transfer {
            path: dst.to_path_buf(),
            source,
        }
    })?;

    temp_file.persist(dst).map_err(|e| Error::Persist {
        path: dst.to_path_buf(),
        source: e.error,
    })?;

    Ok(FileAction::Copied { bytes })
}

/// Rewrite the differing bytes of `dst` and append the missing tail.
///
/// `dst_len` must not exceed the source length.
fn patch_in_place(src: &Path, dst: &Path, dst_len: u64) -> Result<FileAction> {
    let mut dst_file = match OpenOptions::new().read(true).write(true).open(dst) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            replicate_link(src, dst)?;
            return Ok(FileAction::LinkFallback);
        }
        Err(source) => {
            return Err(Error::Transfer {
                path: dst.to_path_buf(),
                source,
            });
        }
    };

    let bytes = File::open(src)
        .and_then(|mut src_file| patch_file(&mut src_file, &mut dst_file, dst_len))
        .map_err(|source| Error::Transfer {
            path: dst.to_path_buf(),
            source,
        })?;

    Ok(FileAction::Patched { bytes })
}

/// Patch `dst` so it matches `src` byte for byte, returning bytes written.
///
/// Both handles must be positioned at the start. `dst_len` is the current
/// destination length and must not exceed the source length.
pub(crate) fn patch_file<S, D>(src: &mut S, dst: &mut D, dst_len: u64) -> io::Result<u64>
where
    S: Read,
    D: Read + Write + Seek,
{
    let mut src_buf = vec![0u8; PATCH_BLOCK_SIZE];
    let mut dst_buf = vec![0u8; PATCH_BLOCK_SIZE];
    let mut offset: u64 = 0;
    let mut written: u64 = 0;

    while offset < dst_len {
        let n = (dst_len - offset).min(PATCH_BLOCK_SIZE as u64) as usize;
        src.read_exact(&mut src_buf[..n])?;
        dst.seek(SeekFrom::Start(offset))?;
        dst.read_exact(&mut dst_buf[..n])?;

        for run in differing_runs(&src_buf[..n], &dst_buf[..n]) {
            dst.seek(SeekFrom::Start(offset + run.start as u64))?;
            dst.write_all(&src_buf[run.clone()])?;
            written += run.len() as u64;
        }

        offset += n as u64;
    }

    dst.seek(SeekFrom::Start(dst_len))?;
    written += io::copy(src, dst)?;
    dst.flush()?;

    Ok(written)
}

/// Ranges of offsets where `a` and `b` differ, merged into contiguous runs.
///
/// Both slices must have the same length.
pub(crate) fn differing_runs(a: &[u8], b: &[u8]) -> Vec<Range<usize>> {
    debug_assert_eq!(a.len(), b.len());

    let mut runs = Vec::new();
    let mut i = 0;
    while i < a.len() {
        if a[i] == b[i] {
            i += 1;
            continue;
        }
        let start = i;
        while i < a.len() && a[i] != b[i] {
            i += 1;
        }
        runs.push(start..i);
    }
    runs
}

/// Copy file contents using the best available method.
///
/// On Linux, uses `copy_file_range` so the data never enters userspace.
/// Falls back to `std::io::copy` on other platforms or on error.
fn copy_contents(src: &File, dst: &File, len: u64) -> io::Result<u64> {
    #[cfg(target_os = "linux")]
    {
        copy_file_range_all(src, dst, len)
    }
    #[cfg(not(target_os = "linux"))]
    {
        use std::io::BufReader;
        let _ = len;
        io::copy(&mut BufReader::new(src), &mut &*dst)
    }
}

#[cfg(target_os = "linux")]
fn copy_file_range_all(src: &File, dst: &File, len: u64) -> io::Result<u64> {
    use std::os::unix::io::AsRawFd;

    let mut remaining = len;
    let mut copied: u64 = 0;

    while remaining > 0 {
        let chunk_size = remaining.min(128 * 1024 * 1024) as usize;

        // SAFETY: both descriptors are open for the duration of the call and
        // null offsets make the kernel use (and advance) the file positions.
        let result = unsafe {
            libc::copy_file_range(
                src.as_raw_fd(),
                std::ptr::null_mut(),
                dst.as_raw_fd(),
                std::ptr::null_mut(),
                chunk_size,
                0,
            )
        };

        if result < 0 {
            let err = io::Error::last_os_error();
            // EXDEV: cross-device, ENOSYS/EINVAL/EOPNOTSUPP: unsupported here
            if copied == 0
                && matches!(
                    err.raw_os_error(),
                    Some(libc::EXDEV | libc::ENOSYS | libc::EINVAL | libc::EOPNOTSUPP)
                )
            {
                use std::io::BufReader;
                return io::copy(&mut BufReader::new(src), &mut &*dst);
            }
            return Err(err);
        }

        if result == 0 {
            // Source shrank underneath us
            break;
        }

        copied += result as u64;
        remaining = remaining.saturating_sub(result as u64);
    }

    Ok(copied)
}
