//! Path and filesystem helpers shared by the synchronization engine.

pub mod path;
