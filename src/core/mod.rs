//! Core module - Rule model and shared utilities
//!
//! This module provides:
//! - Rule configuration and its compiled form
//! - Decision model (verdicts and deciding rules)
//! - Path normalization utilities
//! - Lossy file reading
//! - Error types

pub mod error;
pub mod file_reader;
pub mod model;
pub mod paths;
pub mod rules;
