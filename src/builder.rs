//! Builder API for ergonomic synchronization runs.
//!
//! The builder pattern provides a fluent interface for configuring and running
//! a synchronization. This is often more convenient than constructing a
//! [`TransferPolicy`] and calling [`sync_all`](crate::sync_all) by hand.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use tinysync::SyncBuilder;
//!
//! // Single file with the default quick check
//! let report = SyncBuilder::new("notes.txt", "backup/").run();
//! println!("Copied {} files", report.stats.files_copied);
//! ```
//!
//! ## Directory Trees
//!
//! ```no_run
//! use tinysync::SyncBuilder;
//!
//! let report = SyncBuilder::new("project/", "/backup/project")
//!     .recursive()           // Walk directories
//!     .update()              // Keep files that are newer at the destination
//!     .run();
//!
//! for error in &report.errors {
//!     eprintln!("{error}");
//! }
//! ```
//!
//! ## Several Sources
//!
//! ```no_run
//! use tinysync::SyncBuilder;
//!
//! let report = SyncBuilder::new("a.txt", "out/")
//!     .source("b.txt")
//!     .source("docs")
//!     .recursive()
//!     .run();
//! assert!(report.is_success());
//! ```

use crate::options::TransferPolicy;
use crate::sync::{SyncReport, sync_all};
use std::path::{Path, PathBuf};

/// A builder for configuring and running a synchronization.
///
/// Sources are processed in the order they were added; the destination is
/// interpreted for each of them exactly as the command line would.
///
/// # Example
///
/// ```no_run
/// use tinysync::SyncBuilder;
///
/// let report = SyncBuilder::new("/data/project", "/backup/")
///     .recursive()
///     .update()
///     .run();
/// println!("{} bytes written", report.stats.bytes_written);
/// ```
#[derive(Debug, Clone)]
pub struct SyncBuilder {
    sources: Vec<PathBuf>,
    dst: PathBuf,
    policy: TransferPolicy,
}

impl SyncBuilder {
    /// Create a new `SyncBuilder` with one source and the destination.
    ///
    /// Uses the default policy (quick check on size and mtime, no recursion).
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tinysync::SyncBuilder;
    ///
    /// let builder = SyncBuilder::new("src.txt", "dst.txt");
    /// ```
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Self {
        Self {
            sources: vec![src.as_ref().to_path_buf()],
            dst: dst.as_ref().to_path_buf(),
            policy: TransferPolicy::default(),
        }
    }

    /// Add another source.
    #[must_use]
    pub fn source<P: AsRef<Path>>(mut self, src: P) -> Self {
        self.sources.push(src.as_ref().to_path_buf());
        self
    }

    /// Only transfer files whose source is strictly newer than the
    /// destination.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tinysync::SyncBuilder;
    ///
    /// let report = SyncBuilder::new("src/", "dst")
    ///     .recursive()
    ///     .update()
    ///     .run();
    /// if report.stats.files_skipped > 0 {
    ///     println!("Skipped {} up-to-date files", report.stats.files_skipped);
    /// }
    /// ```
    #[must_use]
    pub fn update(mut self) -> Self {
        self.policy = self.policy.with_update();
        self
    }

    /// Skip the quick check and always transfer.
    #[must_use]
    pub fn checksum(mut self) -> Self {
        self.policy = self.policy.with_checksum();
        self
    }

    /// Descend into directory sources.
    ///
    /// Without it, directory sources are skipped with a warning.
    #[must_use]
    pub fn recursive(mut self) -> Self {
        self.policy = self.policy.with_recursive();
        self
    }

    /// Set a custom warning handler for non-fatal issues.
    ///
    /// Warnings include skipped directories, skipped special files and
    /// unwritable destinations replaced by hard links.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tinysync::SyncBuilder;
    ///
    /// let report = SyncBuilder::new("src", "dst")
    ///     .warn_handler(|msg| eprintln!("Warning: {}", msg))
    ///     .run();
    /// ```
    #[must_use]
    pub fn warn_handler(mut self, handler: fn(&str)) -> Self {
        self.policy = self.policy.with_warn_handler(handler);
        self
    }

    /// Get a reference to the current policy.
    pub fn policy(&self) -> &TransferPolicy {
        &self.policy
    }

    /// Run the synchronization.
    ///
    /// Never fails as a whole: per-entry errors are collected in the returned
    /// [`SyncReport`], check [`SyncReport::is_success`].
    pub fn run(self) -> SyncReport {
        sync_all(&self.sources, &self.dst, &self.policy)
    }
}
