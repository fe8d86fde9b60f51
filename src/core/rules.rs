//! Rule configuration
//!
//! [`RuleConfig`] is the operator-editable form of the rule tables (TOML on
//! disk, built-in defaults otherwise). [`RuleSet`] is the compiled form the
//! pruner and classifier read from; it is built once per run and only ever
//! shared by reference.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::RuleError;
use crate::core::paths::normalize_rel;

/// Rules file picked up from the traversal root when `--rules` is not given
pub const RULES_FILE: &str = "fencepack.toml";

/// Editable rule tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleConfig {
    /// Extensions (with leading '.') whose files are admitted
    pub include_extensions: BTreeSet<String>,
    /// Extensions (with leading '.') whose files are rejected
    pub exclude_extensions: BTreeSet<String>,
    /// Exact file names that are admitted
    pub include_filenames: BTreeSet<String>,
    /// Exact file names that are rejected
    pub exclude_filenames: BTreeSet<String>,
    /// Patterns that must match the whole file name to admit it
    pub include_regexes: Vec<String>,
    /// Patterns that must match the whole file name to reject it
    pub exclude_regexes: Vec<String>,
    /// Admit extensionless files whose first line starts with `#!`
    pub include_shebang: bool,
    /// Root-relative directories pruned from traversal
    pub exclude_dirs: BTreeSet<String>,
    /// Root-relative files written even when their directory is pruned
    pub always_include_files: Vec<String>,
}

fn strings<const N: usize>(items: [&str; N]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            include_extensions: strings([".c", ".h"]),
            exclude_extensions: strings([".o", ".md", ".data", ".js", ".wasm", ".txt"]),
            include_filenames: strings(["Makefile"]),
            exclude_filenames: strings(["output.md", "README.org", ".emscripten"]),
            include_regexes: vec![r"^\d+$".to_string()],
            exclude_regexes: vec![r"^gpt\d+.py$".to_string()],
            include_shebang: true,
            exclude_dirs: strings([
                ".emscripten_cache",
                ".git",
                "web",
                "src/core",
                "src/gfx",
                "src/apps",
            ]),
            always_include_files: vec![
                "src/apps/console_processor.c".to_string(),
                "src/apps/console_processor_ext.c".to_string(),
                "src/apps/console_sink.c".to_string(),
            ],
        }
    }
}

impl RuleConfig {
    /// An empty configuration: no tables, shebang fallback off
    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            include_extensions: BTreeSet::new(),
            exclude_extensions: BTreeSet::new(),
            include_filenames: BTreeSet::new(),
            exclude_filenames: BTreeSet::new(),
            include_regexes: Vec::new(),
            exclude_regexes: Vec::new(),
            include_shebang: false,
            exclude_dirs: BTreeSet::new(),
            always_include_files: Vec::new(),
        }
    }

    /// Parse a TOML rules document. Tables the document omits keep their defaults.
    pub fn from_toml(source: &str, path: &Path) -> Result<Self, RuleError> {
        toml::from_str(source).map_err(|source| RuleError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a TOML rules file
    pub fn load(path: &Path) -> Result<Self, RuleError> {
        let source = fs::read_to_string(path).map_err(|source| RuleError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&source, path)
    }

    /// Resolve the rules for a run: an explicit file, then `<root>/fencepack.toml`,
    /// then the built-in defaults. Returns the file the rules came from, if any.
    pub fn discover(
        root: &Path,
        explicit: Option<&Path>,
    ) -> Result<(Self, Option<PathBuf>), RuleError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        let candidate = root.join(RULES_FILE);
        if candidate.is_file() {
            let config = Self::load(&candidate)?;
            return Ok((config, Some(candidate)));
        }

        Ok((Self::default(), None))
    }

    /// Render the configuration as a TOML document
    pub fn to_toml(&self) -> Result<String, RuleError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Compiled, read-only rule tables
#[derive(Debug, Clone)]
pub struct RuleSet {
    include_extensions: HashSet<String>,
    exclude_extensions: HashSet<String>,
    include_filenames: HashSet<String>,
    exclude_filenames: HashSet<String>,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
    include_shebang: bool,
    exclude_dirs: HashSet<String>,
    always_include_files: Vec<String>,
}

/// Extension entries are compared with their leading '.'
fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

fn compile_full_match(table: &'static str, patterns: &[String]) -> Result<Vec<Regex>, RuleError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&format!("^(?:{})$", pattern)).map_err(|source| RuleError::InvalidRegex {
                table,
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

impl RuleSet {
    /// Compile a configuration
    pub fn compile(config: &RuleConfig) -> Result<Self, RuleError> {
        let mut always_include_files = Vec::new();
        for entry in &config.always_include_files {
            let rel = normalize_rel(entry);
            if !always_include_files.contains(&rel) {
                always_include_files.push(rel);
            }
        }

        Ok(Self {
            include_extensions: config
                .include_extensions
                .iter()
                .map(|e| normalize_extension(e))
                .collect(),
            exclude_extensions: config
                .exclude_extensions
                .iter()
                .map(|e| normalize_extension(e))
                .collect(),
            include_filenames: config.include_filenames.iter().cloned().collect(),
            exclude_filenames: config.exclude_filenames.iter().cloned().collect(),
            include_regexes: compile_full_match("include_regexes", &config.include_regexes)?,
            exclude_regexes: compile_full_match("exclude_regexes", &config.exclude_regexes)?,
            include_shebang: config.include_shebang,
            exclude_dirs: config.exclude_dirs.iter().map(|d| normalize_rel(d)).collect(),
            always_include_files,
        })
    }

    pub fn is_excluded_filename(&self, name: &str) -> bool {
        self.exclude_filenames.contains(name)
    }

    pub fn is_excluded_extension(&self, ext: &str) -> bool {
        self.exclude_extensions.contains(ext)
    }

    pub fn matches_exclude_regex(&self, name: &str) -> bool {
        self.exclude_regexes.iter().any(|rx| rx.is_match(name))
    }

    pub fn is_included_filename(&self, name: &str) -> bool {
        self.include_filenames.contains(name)
    }

    pub fn is_included_extension(&self, ext: &str) -> bool {
        self.include_extensions.contains(ext)
    }

    pub fn matches_include_regex(&self, name: &str) -> bool {
        self.include_regexes.iter().any(|rx| rx.is_match(name))
    }

    pub fn shebang_enabled(&self) -> bool {
        self.include_shebang
    }

    /// Whether a normalized relative directory path is pruned
    pub fn is_excluded_dir(&self, rel: &str) -> bool {
        self.exclude_dirs.contains(rel)
    }

    /// Normalized force-include paths, in configured order
    pub fn always_include_files(&self) -> &[String] {
        &self.always_include_files
    }

    /// Whether a normalized relative file path is force-included
    pub fn is_always_included(&self, rel: &str) -> bool {
        self.always_include_files.iter().any(|f| f == rel)
    }
}
