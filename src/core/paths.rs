//! Path normalization utilities
//!
//! Every path used as a rule key (`exclude_dirs`, `always_include_files`) and
//! every path derived during traversal goes through [`normalize_rel`], so the
//! two sides always compare with the same separator and the same spelling.

use std::path::{Path, PathBuf};

/// Relative path of the traversal root itself
pub const ROOT_REL: &str = ".";

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Lexically normalize a root-relative path.
///
/// Separators become '/', empty and `.` components are dropped and `..`
/// cancels the previous component when there is one. The root itself
/// normalizes to [`ROOT_REL`].
pub fn normalize_rel(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let mut parts: Vec<&str> = Vec::new();

    for component in unified.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                if parts.last().map_or(false, |last| *last != "..") {
                    parts.pop();
                } else {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        ROOT_REL.to_string()
    } else {
        parts.join("/")
    }
}

/// Join a child name onto a normalized relative path
pub fn join_rel(base: &str, name: &str) -> String {
    normalize_rel(&format!("{}/{}", base, name))
}

/// Convert a normalized relative path to a native `PathBuf`
pub fn to_native(rel: &str) -> PathBuf {
    if rel == ROOT_REL {
        return PathBuf::new();
    }
    rel.split('/').collect()
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}
