//! Flows module - Commands built on the engine
//!
//! Provides:
//! - pack: Write admitted files into the fenced artifact
//! - explain: Report which rule decides a path

pub mod explain;
pub mod pack;
