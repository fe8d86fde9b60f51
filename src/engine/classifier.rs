//! File classifier
//!
//! A file name is checked against [`FILE_RULES`] from top to bottom and the
//! first rule that applies decides. Exclusion rules come before inclusion
//! rules, so an exclusion always wins; the shebang probe is last because it
//! is the only rule that touches the filesystem.

use std::path::Path;
use tracing::debug;

use crate::core::file_reader::{read_first_line, FIRST_LINE_LIMIT};
use crate::core::model::{Decision, RuleKind, Verdict};
use crate::core::rules::RuleSet;

/// Split a file name into stem and extension (with its leading '.').
///
/// Dots at the start of the name never begin an extension, so `.bashrc`
/// has none while `foo.` has `"."`.
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading = name.len() - name.trim_start_matches('.').len();
    match name.rfind('.') {
        Some(dot) if dot >= leading => (&name[..dot], &name[dot..]),
        _ => (name, ""),
    }
}

/// A file under classification
pub struct Candidate<'a> {
    pub name: &'a str,
    pub ext: &'a str,
    pub dir: &'a Path,
}

type Predicate = fn(&RuleSet, &Candidate<'_>) -> bool;

/// One row of the precedence table
pub struct FileRule {
    pub kind: RuleKind,
    pub verdict: Verdict,
    applies: Predicate,
}

fn excluded_filename(rules: &RuleSet, c: &Candidate<'_>) -> bool {
    rules.is_excluded_filename(c.name)
}

fn excluded_extension(rules: &RuleSet, c: &Candidate<'_>) -> bool {
    rules.is_excluded_extension(c.ext)
}

fn excluded_regex(rules: &RuleSet, c: &Candidate<'_>) -> bool {
    rules.matches_exclude_regex(c.name)
}

fn included_filename(rules: &RuleSet, c: &Candidate<'_>) -> bool {
    rules.is_included_filename(c.name)
}

fn included_extension(rules: &RuleSet, c: &Candidate<'_>) -> bool {
    !c.ext.is_empty() && rules.is_included_extension(c.ext)
}

fn included_regex(rules: &RuleSet, c: &Candidate<'_>) -> bool {
    rules.matches_include_regex(c.name)
}

fn has_shebang(rules: &RuleSet, c: &Candidate<'_>) -> bool {
    if !rules.shebang_enabled() || !c.ext.is_empty() {
        return false;
    }
    // Unreadable files simply have no shebang
    read_first_line(&c.dir.join(c.name), FIRST_LINE_LIMIT)
        .map(|line| line.starts_with("#!"))
        .unwrap_or(false)
}

/// File rules in precedence order; a file matching none is excluded
pub static FILE_RULES: [FileRule; 7] = [
    FileRule {
        kind: RuleKind::ExcludeFilename,
        verdict: Verdict::Exclude,
        applies: excluded_filename,
    },
    FileRule {
        kind: RuleKind::ExcludeExtension,
        verdict: Verdict::Exclude,
        applies: excluded_extension,
    },
    FileRule {
        kind: RuleKind::ExcludeRegex,
        verdict: Verdict::Exclude,
        applies: excluded_regex,
    },
    FileRule {
        kind: RuleKind::IncludeFilename,
        verdict: Verdict::Include,
        applies: included_filename,
    },
    FileRule {
        kind: RuleKind::IncludeExtension,
        verdict: Verdict::Include,
        applies: included_extension,
    },
    FileRule {
        kind: RuleKind::IncludeRegex,
        verdict: Verdict::Include,
        applies: included_regex,
    },
    FileRule {
        kind: RuleKind::Shebang,
        verdict: Verdict::Include,
        applies: has_shebang,
    },
];

/// Decides file admission against a rule set
pub struct Classifier<'a> {
    rules: &'a RuleSet,
}

impl<'a> Classifier<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Run the rule table for `name` inside `dir`
    pub fn decide(&self, name: &str, dir: &Path) -> Decision {
        let (_, ext) = split_extension(name);
        let candidate = Candidate { name, ext, dir };

        let decision = FILE_RULES
            .iter()
            .find(|rule| (rule.applies)(self.rules, &candidate))
            .map(|rule| Decision::new(rule.verdict, rule.kind))
            .unwrap_or(Decision::new(Verdict::Exclude, RuleKind::Default));

        debug!(
            file = %dir.join(name).display(),
            rule = %decision.rule,
            verdict = ?decision.verdict,
            "classified"
        );
        decision
    }

    /// Whether `name` inside `dir` is admitted
    pub fn classify(&self, name: &str, dir: &Path) -> bool {
        self.decide(name, dir).verdict.is_include()
    }
}
