//! Directory pruner
//!
//! Runs once per visited directory, before the walker descends, so excluded
//! subtrees are never listed or opened.

use tracing::debug;

use crate::core::paths::{join_rel, normalize_rel};
use crate::core::rules::RuleSet;

/// What to do with the current directory and which children to visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneOutcome {
    /// Classify the files of the current directory
    pub process_current: bool,
    /// Subdirectory names that survive, in input order
    pub subdirs: Vec<String>,
}

/// Applies `exclude_dirs` to a traversal position
pub struct Pruner<'a> {
    rules: &'a RuleSet,
}

impl<'a> Pruner<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Decide whether `current_rel` is processed and which of its subdirectories are kept
    pub fn prune(&self, current_rel: &str, subdirs: &[String]) -> PruneOutcome {
        let current = normalize_rel(current_rel);

        if self.rules.is_excluded_dir(&current) {
            debug!(dir = %current, "directory excluded");
            return PruneOutcome {
                process_current: false,
                subdirs: Vec::new(),
            };
        }

        let kept = subdirs
            .iter()
            .filter(|name| {
                let child = join_rel(&current, name);
                let excluded = self.rules.is_excluded_dir(&child);
                if excluded {
                    debug!(dir = %child, "pruned");
                }
                !excluded
            })
            .cloned()
            .collect();

        PruneOutcome {
            process_current: true,
            subdirs: kept,
        }
    }

    /// First ancestor of a root-relative file path that is pruned, if any
    pub fn pruned_ancestor(&self, file_rel: &str) -> Option<String> {
        let rel = normalize_rel(file_rel);
        let mut dir = String::from(".");

        if self.rules.is_excluded_dir(&dir) {
            return Some(dir);
        }

        let components: Vec<&str> = rel.split('/').collect();
        for name in &components[..components.len().saturating_sub(1)] {
            dir = join_rel(&dir, name);
            if self.rules.is_excluded_dir(&dir) {
                return Some(dir);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::RuleConfig;
    use std::collections::BTreeSet;

    fn rules_with_dirs(dirs: &[&str]) -> RuleSet {
        let config = RuleConfig {
            exclude_dirs: dirs.iter().map(|d| d.to_string()).collect::<BTreeSet<_>>(),
            ..RuleConfig::empty()
        };
        RuleSet::compile(&config).unwrap()
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_root_filters_direct_children() {
        let rules = rules_with_dirs(&[".git", "web"]);
        let pruner = Pruner::new(&rules);

        let outcome = pruner.prune(".", &names(&[".git", "src", "web"]));
        assert!(outcome.process_current);
        assert_eq!(outcome.subdirs, names(&["src"]));
    }

    #[test]
    fn test_nested_children_are_joined_before_lookup() {
        let rules = rules_with_dirs(&["src/core"]);
        let pruner = Pruner::new(&rules);

        let outcome = pruner.prune("src", &names(&["app", "core"]));
        assert_eq!(outcome.subdirs, names(&["app"]));

        // A directory named "core" elsewhere is untouched
        let outcome = pruner.prune("lib", &names(&["core"]));
        assert_eq!(outcome.subdirs, names(&["core"]));
    }

    #[test]
    fn test_excluded_current_dir_is_skipped_entirely() {
        let rules = rules_with_dirs(&["src/core"]);
        let pruner = Pruner::new(&rules);

        let outcome = pruner.prune("src/core", &names(&["a", "b"]));
        assert!(!outcome.process_current);
        assert!(outcome.subdirs.is_empty());
    }

    #[test]
    fn test_current_path_is_normalized() {
        let rules = rules_with_dirs(&["src/core"]);
        let pruner = Pruner::new(&rules);

        assert!(!pruner.prune("./src/core/", &[]).process_current);
        assert!(!pruner.prune("src\\core", &[]).process_current);
    }

    #[test]
    fn test_root_only_excluded_when_listed() {
        let rules = rules_with_dirs(&["src"]);
        assert!(Pruner::new(&rules).prune("", &[]).process_current);

        let rules = rules_with_dirs(&["."]);
        let outcome = Pruner::new(&rules).prune("", &names(&["src"]));
        assert!(!outcome.process_current);
        assert!(outcome.subdirs.is_empty());
    }

    #[test]
    fn test_empty_listing() {
        let rules = rules_with_dirs(&[]);
        let outcome = Pruner::new(&rules).prune(".", &[]);
        assert!(outcome.process_current);
        assert!(outcome.subdirs.is_empty());
    }

    #[test]
    fn test_pruned_ancestor() {
        let rules = rules_with_dirs(&["src/apps"]);
        let pruner = Pruner::new(&rules);

        assert_eq!(
            pruner.pruned_ancestor("src/apps/deep/x.c"),
            Some("src/apps".to_string())
        );
        assert_eq!(pruner.pruned_ancestor("src/app/b.c"), None);
        // The file itself is not a directory
        assert_eq!(pruner.pruned_ancestor("src/apps"), None);
    }
}
