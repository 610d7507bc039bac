//! Per-run counters and error collection.

use super::FileAction;
use super::link::LinkKind;
use crate::error::Error;
use std::time::Duration;

/// Statistics from a synchronization run
///
/// # Example
///
/// ```no_run
/// use tinysync::{TransferPolicy, sync_path};
/// use std::path::Path;
///
/// let policy = TransferPolicy::default().with_recursive();
/// let report = sync_path(Path::new("src"), Path::new("backup"), &policy);
/// println!("Copied {} files ({} bytes)", report.stats.files_copied, report.stats.bytes_written);
/// println!("Skipped {} files", report.stats.files_skipped);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Files written as fresh copies
    pub files_copied: u64,
    /// Files updated in place
    pub files_patched: u64,
    /// Files already up to date
    pub files_skipped: u64,
    /// Symbolic links recreated at the destination
    pub symlinks_replicated: u64,
    /// Hard links recreated at the destination
    pub hardlinks_replicated: u64,
    /// Unwritable destinations replaced by a hard link to the source
    pub link_fallbacks: u64,
    /// Destination directories created
    pub dirs_created: u64,
    /// Directory sources skipped because recursion was off
    pub dirs_skipped: u64,
    /// Content bytes written
    pub bytes_written: u64,
    /// Wall time spent
    pub duration: Duration,
}

impl SyncStats {
    /// Count the outcome of one file.
    pub fn record(&mut self, action: FileAction) {
        match action {
            FileAction::Skipped => self.files_skipped += 1,
            FileAction::Copied { bytes } => {
                self.files_copied += 1;
                self.bytes_written += bytes;
            }
            FileAction::Patched { bytes } => {
                self.files_patched += 1;
                self.bytes_written += bytes;
            }
            FileAction::Linked(LinkKind::Symbolic) => self.symlinks_replicated += 1,
            FileAction::Linked(LinkKind::Hard) => self.hardlinks_replicated += 1,
            FileAction::LinkFallback => self.link_fallbacks += 1,
        }
    }

    /// Files that were written or linked, as opposed to skipped.
    pub fn files_transferred(&self) -> u64 {
        self.files_copied
            + self.files_patched
            + self.symlinks_replicated
            + self.hardlinks_replicated
            + self.link_fallbacks
    }

    /// Add another run's counters to these.
    pub fn merge(&mut self, other: &SyncStats) {
        self.files_copied += other.files_copied;
        self.files_patched += other.files_patched;
        self.files_skipped += other.files_skipped;
        self.symlinks_replicated += other.symlinks_replicated;
        self.hardlinks_replicated += other.hardlinks_replicated;
        self.link_fallbacks += other.link_fallbacks;
        self.dirs_created += other.dirs_created;
        self.dirs_skipped += other.dirs_skipped;
        self.bytes_written += other.bytes_written;
        self.duration += other.duration;
    }
}

/// Outcome of a run: counters plus every per-entry error, in the order they
/// were encountered.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Aggregated counters
    pub stats: SyncStats,
    /// Errors that caused an entry to be skipped
    pub errors: Vec<Error>,
}

impl SyncReport {
    /// True when no entry failed.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record a per-entry failure and keep going.
    pub(crate) fn fail(&mut self, error: Error) {
        #[cfg(feature = "tracing")]
        tracing::debug!(%error, "entry failed");
        self.errors.push(error);
    }

    /// Fold `other` into this report, keeping error order.
    pub fn merge(&mut self, other: SyncReport) {
        self.stats.merge(&other.stats);
        self.errors.extend(other.errors);
    }
}
