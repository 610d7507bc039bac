//! Error types for tinysync.
//!
//! This module provides the [`Error`] enum containing all failures that can be
//! reported for a synchronized entry, the [`Result`] type alias, and
//! [`ErrorCode`], a stable category for logs and front-ends that need to tell
//! failures apart without matching on message text. `tsync` logs it per
//! failed entry at debug level; every failed entry exits with the same
//! partial-transfer status.
//!
//! # Error Categories
//!
//! | Category | Errors |
//! |----------|--------|
//! | Source | [`Error::SourceNotFound`], [`Error::PermissionDenied`] |
//! | Destination | [`Error::CreateDir`], [`Error::TempFile`], [`Error::Persist`] |
//! | Transfer | [`Error::Transfer`], [`Error::Link`], [`Error::Metadata`] |
//! | Traversal | [`Error::Stat`], [`Error::ReadDir`] |
//! | IO | [`Error::Io`] |
//!
//! Permission failures on the *destination* during a content transfer are not
//! errors: the transfer engine recovers by hard-linking the source instead.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for tinysync operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Check if an IO error indicates "no space left on device".
///
/// # Example
///
/// ```no_run
/// use std::io;
/// use tinysync::is_no_space_error;
///
/// let error = io::Error::new(io::ErrorKind::StorageFull, "disk full");
/// assert!(is_no_space_error(&error));
/// ```
pub fn is_no_space_error(error: &io::Error) -> bool {
    if error.kind() == io::ErrorKind::StorageFull {
        return true;
    }

    #[cfg(unix)]
    {
        // The raw OS error might be available even if kind() isn't StorageFull
        if let Some(raw_error) = error.raw_os_error() {
            const ENOSPC: i32 = 28;
            return raw_error == ENOSPC;
        }
    }

    false
}

/// Stable error category, independent of the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The source argument does not exist
    SourceNotFound,
    /// The source could not be opened for reading
    PermissionDenied,
    /// The destination filesystem is full
    NoSpace,
    /// Any other filesystem failure
    Io,
}

impl ErrorCode {
    /// Short lowercase identifier, suitable for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SourceNotFound => "source_not_found",
            Self::PermissionDenied => "permission_denied",
            Self::NoSpace => "no_space",
            Self::Io => "io_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors reported for a synchronized entry.
///
/// Every variant carries the path it concerns. Source paths in
/// [`Error::SourceNotFound`] and [`Error::PermissionDenied`] are absolute so
/// messages stay meaningful regardless of the working directory.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// IO error that could not be attributed to a specific path
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Source path does not exist
    #[error("link_stat \"{0}\" failed: No such file or directory (2)")]
    SourceNotFound(PathBuf),

    /// Source path exists but cannot be opened for reading
    #[error("send_files failed to open \"{0}\": Permission denied (13)")]
    PermissionDenied(PathBuf),

    /// Entry could not be inspected
    #[error("Failed to stat {path}: {source}")]
    Stat {
        /// Path being inspected
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Destination directory could not be created
    ///
    /// Parent directories are created one level deep only, so a destination
    /// whose grandparent is missing ends up here.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        /// Directory that was being created
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Source directory could not be listed
    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        /// Directory being listed
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Content transfer failed
    #[error("Failed to transfer {path}: {source}")]
    Transfer {
        /// Destination file
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Symbolic or hard link could not be replicated
    #[error("Failed to replicate link {path}: {source}")]
    Link {
        /// Destination link path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Mode or timestamps could not be propagated
    #[error("Failed to set metadata on {path}: {source}")]
    Metadata {
        /// Destination path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to create temporary file
    #[error("Failed to create temporary file in {path}: {source}")]
    TempFile {
        /// Directory where temp file creation was attempted
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to persist temporary file
    #[error("Failed to persist temporary file to {path}: {source}")]
    Persist {
        /// Target path
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
}

impl Error {
    /// The category of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::SourceNotFound(_) => ErrorCode::SourceNotFound,
            Self::PermissionDenied(_) => ErrorCode::PermissionDenied,
            Self::Io(source)
            | Self::Stat { source, .. }
            | Self::CreateDir { source, .. }
            | Self::ReadDir { source, .. }
            | Self::Transfer { source, .. }
            | Self::Link { source, .. }
            | Self::Metadata { source, .. }
            | Self::TempFile { source, .. }
            | Self::Persist { source, .. } => {
                if is_no_space_error(source) {
                    ErrorCode::NoSpace
                } else {
                    ErrorCode::Io
                }
            }
        }
    }
}
