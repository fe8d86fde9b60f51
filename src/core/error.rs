//! Error types for rule loading and artifact writing

use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading or compiling a rule configuration
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Failed to read rules file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse rules file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid {table} pattern '{pattern}': {source}")]
    InvalidRegex {
        table: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to render rules: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Failures that abort a pack run
#[derive(Debug, Error)]
pub enum PackError {
    #[error("Cannot open output artifact {path}: {source}")]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output artifact: {0}")]
    Write(#[from] std::io::Error),
}
