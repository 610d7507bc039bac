//! Edge case integration tests for tsync CLI.
//!
//! These tests cover edge cases and advanced features:
//! - Symbolic and hard link replication
//! - Timestamp and permission propagation
//! - File type conflicts at the destination
//! - Special filenames and boundary conditions

#[path = "../common/mod.rs"]
mod common;

#[path = "edge_cases/boundary_cases.rs"]
mod boundary_cases;

#[path = "edge_cases/file_type_conflict.rs"]
mod file_type_conflict;


#[path = "edge_cases/timestamp_preservation.rs"]
mod timestamp_preservation;
