//! # tinysync
//!
//! Local, one-way file synchronization in the spirit of `rsync`.
//!
//! ## Core Features
//!
//! - **Quick check**: Skips files whose size and modification time already match
//! - **Update mode**: Never overwrites a destination that is as new as the source
//! - **In-place patching**: Rewrites only the bytes that differ in an existing destination
//! - **Atomic fresh copies**: New files are staged in a temp file and renamed into place
//! - **Link preserving**: Symlinks keep their target text, hard links keep sharing an inode
//! - **Metadata preserving**: Copies permission bits and access/modification times
//! - **Trailing-slash semantics**: `dir` is recreated inside the destination, `dir/` is merged into it
//! - **Keeps going**: A failing entry is reported and the run continues
//!
//! ## Quick Start with Builder API
//!
//! The easiest way to use tinysync is with the [`SyncBuilder`]:
//!
//! ```no_run
//! use tinysync::SyncBuilder;
//!
//! let report = SyncBuilder::new("project", "backup/")
//!     .recursive()
//!     .run();
//! println!("Copied {} files ({} bytes)", report.stats.files_copied, report.stats.bytes_written);
//! ```
//!
//! ### Incremental Backup
//!
//! ```no_run
//! use tinysync::SyncBuilder;
//!
//! // Leave files alone that were edited at the destination
//! let report = SyncBuilder::new("project/", "backup")
//!     .recursive()
//!     .update()
//!     .run();
//!
//! println!("Updated {} files, {} already up-to-date",
//!     report.stats.files_transferred(), report.stats.files_skipped);
//! ```
//!
//! ## Function API
//!
//! For more control, use the function API with [`TransferPolicy`]:
//!
//! ```no_run
//! use tinysync::{TransferPolicy, sync_all};
//! use std::path::Path;
//!
//! let policy = TransferPolicy::default().with_recursive();
//! let report = sync_all(&["docs", "notes.txt"], Path::new("backup/"), &policy);
//! if !report.is_success() {
//!     for error in &report.errors {
//!         eprintln!("{error}");
//!     }
//! }
//! ```
//!
//! ## Destination Resolution
//!
//! - An existing directory receives sources inside it under their base name.
//! - Any other destination is the literal target path of a single file.
//! - A missing parent directory is created, one level only.
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `tracing` | Structured logging with tracing crate |
//! | `serde` | Serialize/Deserialize for [`TransferPolicy`] |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod error;
mod options;
mod sync;
pub mod utils;

pub use builder::SyncBuilder;
pub use error::{Error, ErrorCode, Result, is_no_space_error};
pub use options::TransferPolicy;
pub use sync::{
    EntryKind, FileAction, LinkKind, SyncReport, SyncStats, classify, is_hard_linked,
    is_source_newer, is_symlink, is_up_to_date, needs_transfer, replicate_link, sync_all,
    sync_entry, sync_file, sync_metadata, sync_path, transfer_content,
};
pub use utils::path::{destination_path, ensure_parent_dir, source_base_name};
