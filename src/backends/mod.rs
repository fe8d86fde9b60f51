//! Backends module - Filesystem collaborators of the engine
//!
//! Provides:
//! - walk: Sorted depth-first directory traversal with walkdir

pub mod walk;
