//! Explain flow - Report which rule decides a path
//!
//! Runs the same pruner and classifier as `pack` against individual paths
//! without writing an artifact.

use anyhow::Result;
use std::path::Path;

use crate::core::model::Explanation;
use crate::core::paths::{make_relative, normalize_rel, to_native, ROOT_REL};
use crate::core::rules::RuleSet;
use crate::engine::classifier::Classifier;
use crate::engine::pruner::Pruner;

/// Explain a single path (absolute, or relative to root)
pub fn explain_path(rules: &RuleSet, root: &Path, path: &Path) -> Explanation {
    let rel = if path.is_absolute() {
        make_relative(path, root)
            .map(|r| normalize_rel(&r))
            .unwrap_or_else(|| normalize_rel(&path.to_string_lossy()))
    } else {
        normalize_rel(&path.to_string_lossy())
    };

    let (parent, name) = match rel.rsplit_once('/') {
        Some((parent, name)) => (parent.to_string(), name.to_string()),
        None => (ROOT_REL.to_string(), rel.clone()),
    };

    let pruned_by = Pruner::new(rules).pruned_ancestor(&rel);
    let decision = Classifier::new(rules).decide(&name, &root.join(to_native(&parent)));
    let force_included = rules.is_always_included(&rel);

    // Both passes only ever write regular files
    let exists = root.join(to_native(&rel)).is_file();
    let admitted = pruned_by.is_none() && decision.verdict.is_include();

    Explanation {
        path: rel,
        pruned_by,
        decision,
        force_included,
        written: exists && (admitted || force_included),
    }
}

/// Run the explain command
pub fn run_explain(
    root: &Path,
    rules: &RuleSet,
    paths: &[std::path::PathBuf],
    pretty: bool,
) -> Result<()> {
    for path in paths {
        let explanation = explain_path(rules, root, path);
        let line = if pretty {
            serde_json::to_string_pretty(&explanation)?
        } else {
            serde_json::to_string(&explanation)?
        };
        println!("{}", line);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{RuleKind, Verdict};
    use crate::core::rules::RuleConfig;
    use std::fs;
    use tempfile::tempdir;

    fn default_rules() -> RuleSet {
        RuleSet::compile(&RuleConfig::default()).unwrap()
    }

    #[test]
    fn test_explain_included_file() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("src/app")).unwrap();
        fs::write(temp.path().join("src/app/b.c"), "b\n").unwrap();

        let item = explain_path(&default_rules(), temp.path(), Path::new("src/app/b.c"));

        assert_eq!(item.path, "src/app/b.c");
        assert!(item.pruned_by.is_none());
        assert_eq!(item.decision.rule, RuleKind::IncludeExtension);
        assert!(item.written);
    }

    #[test]
    fn test_explain_missing_file_is_not_written() {
        let temp = tempdir().unwrap();
        let item = explain_path(&default_rules(), temp.path(), Path::new("does/not/exist.c"));

        assert_eq!(item.decision.rule, RuleKind::IncludeExtension);
        assert!(!item.written);
    }

    #[test]
    fn test_explain_directory_is_not_written() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("lib.c")).unwrap();

        let item = explain_path(&default_rules(), temp.path(), Path::new("lib.c"));
        assert!(!item.written);
    }

    #[test]
    fn test_explain_pruned_file() {
        let temp = tempdir().unwrap();
        let item = explain_path(&default_rules(), temp.path(), Path::new("./src/core/a.c"));

        assert_eq!(item.path, "src/core/a.c");
        assert_eq!(item.pruned_by.as_deref(), Some("src/core"));
        assert_eq!(item.decision.verdict, Verdict::Include);
        assert!(!item.written);
    }

    #[test]
    fn test_explain_force_included_file() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("src/apps/console_sink.c");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, "sink\n").unwrap();

        let item = explain_path(&default_rules(), temp.path(), &target);
        assert_eq!(item.path, "src/apps/console_sink.c");
        assert_eq!(item.pruned_by.as_deref(), Some("src/apps"));
        assert!(item.force_included);
        assert!(item.written);
    }

    #[test]
    fn test_explain_shebang_reads_from_root() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("scripts")).unwrap();
        fs::write(temp.path().join("scripts/deploy"), "#!/bin/bash\n").unwrap();

        let item = explain_path(&default_rules(), temp.path(), Path::new("scripts/deploy"));
        assert_eq!(item.decision.rule, RuleKind::Shebang);
        assert!(item.written);
    }

    #[test]
    fn test_explain_exact_exclude() {
        let temp = tempdir().unwrap();
        let item = explain_path(&default_rules(), temp.path(), Path::new("README.org"));
        assert_eq!(item.decision.rule, RuleKind::ExcludeFilename);
        assert!(!item.written);
    }
}
