//! Directory tree walker
//!
//! Depth-first, top-down traversal that hands each directory's listing to a
//! visitor and descends only into the subdirectories the visitor returns.
//! Entries are sorted by file name so repeated runs see the same order.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::paths::{join_rel, to_native, ROOT_REL};

/// One step of the traversal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirListing {
    /// Normalized path relative to root ("." for the root)
    pub rel: String,
    /// Path on disk
    pub abs: PathBuf,
    /// Subdirectory names, sorted
    pub subdirs: Vec<String>,
    /// File names, sorted
    pub files: Vec<String>,
    /// Subdirectories reached through a symlink; listed but never entered
    pub linked: Vec<String>,
}

/// List the immediate entries of a directory.
///
/// A directory that cannot be read yields an empty listing. Only regular
/// files (or symlinks to them) are listed as files; FIFOs, sockets, device
/// nodes and dangling links are left out.
pub fn list_dir(abs: &Path, rel: &str) -> DirListing {
    let mut listing = DirListing {
        rel: rel.to_string(),
        abs: abs.to_path_buf(),
        ..Default::default()
    };

    let walker = WalkDir::new(abs)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(dir = %abs.display(), error = %err, "cannot list entry");
                continue;
            }
        };

        let name = match entry.file_name().to_str() {
            Some(n) => n.to_string(),
            None => {
                warn!(path = %entry.path().display(), "skipping non UTF-8 name");
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            listing.subdirs.push(name);
        } else if file_type.is_symlink() && entry.path().is_dir() {
            listing.linked.push(name.clone());
            listing.subdirs.push(name);
        } else if file_type.is_file() || (file_type.is_symlink() && entry.path().is_file()) {
            listing.files.push(name);
        } else {
            debug!(path = %entry.path().display(), "skipping non-regular file");
        }
    }

    listing
}

/// Walks a tree rooted at a fixed directory
pub struct TreeWalker {
    root: PathBuf,
}

impl TreeWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Visit every reachable directory. The visitor returns the subdirectory
    /// names to descend into; anything it drops is never listed. The first
    /// visitor error stops the walk.
    pub fn walk<F, E>(&self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&DirListing) -> Result<Vec<String>, E>,
    {
        self.walk_dir(ROOT_REL, &mut visit)
    }

    fn walk_dir<F, E>(&self, rel: &str, visit: &mut F) -> Result<(), E>
    where
        F: FnMut(&DirListing) -> Result<Vec<String>, E>,
    {
        let abs = self.root.join(to_native(rel));
        let listing = list_dir(&abs, rel);
        let descend = visit(&listing)?;

        for name in descend {
            if listing.linked.contains(&name) || !listing.subdirs.contains(&name) {
                continue;
            }
            self.walk_dir(&join_rel(rel, &name), visit)?;
        }

        Ok(())
    }
}
