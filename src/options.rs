//! Transfer policy for synchronization runs.
//!
//! This module provides [`TransferPolicy`], the immutable bundle of flags that
//! decides how every entry of a run is compared and transferred.
//!
//! # Example
//!
//! ```
//! use tinysync::TransferPolicy;
//!
//! let policy = TransferPolicy::default()
//!     .with_update()
//!     .with_recursive();
//! assert!(policy.update && policy.recursive && !policy.checksum);
//! ```

/// How files are compared and whether directories are descended into.
///
/// The same policy value is passed by reference to every operation of a run,
/// including entries discovered while recursing, and is never mutated while
/// the run is in progress.
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `update` | `false` | Skip files that are not strictly newer than the destination |
/// | `checksum` | `false` | Force a transfer instead of the time/size quick check |
/// | `recursive` | `false` | Descend into directories |
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransferPolicy {
    /// Skip destination files that are newer than (or as new as) the source.
    ///
    /// Similar to `rsync --update`. A missing destination is always
    /// transferred.
    pub update: bool,

    /// Decide based on content instead of modification time and size.
    ///
    /// Content hashing is not implemented: every file is treated as changed
    /// when this is set. Takes precedence over `update`.
    pub checksum: bool,

    /// Recurse into directories.
    ///
    /// Without it, directory sources are skipped with a warning.
    pub recursive: bool,

    /// Callback for warnings (optional)
    ///
    /// If not set and `tracing` feature is enabled, warnings are logged via tracing.
    /// Otherwise, warnings are silently ignored.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub warn_handler: Option<fn(&str)>,
}

impl TransferPolicy {
    /// Only transfer files whose source is strictly newer
    #[must_use]
    pub fn with_update(mut self) -> Self {
        self.update = true;
        self
    }

    /// Treat every file as changed
    #[must_use]
    pub fn with_checksum(mut self) -> Self {
        self.checksum = true;
        self
    }

    /// Descend into directories
    #[must_use]
    pub fn with_recursive(mut self) -> Self {
        self.recursive = true;
        self
    }

    /// Create a policy with a warning handler
    #[must_use]
    pub fn with_warn_handler(mut self, handler: fn(&str)) -> Self {
        self.warn_handler = Some(handler);
        self
    }

    pub(crate) fn warn(&self, msg: &str) {
        if let Some(handler) = self.warn_handler {
            handler(msg);
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!("{}", msg);
        }
    }
}
