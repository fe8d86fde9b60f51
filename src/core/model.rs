//! Decision model shared by the classifier, the packer and `explain`

use serde::{Deserialize, Serialize};

/// Outcome for a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Include,
    Exclude,
}

impl Verdict {
    pub fn is_include(self) -> bool {
        self == Verdict::Include
    }
}

/// The file rule that produced a verdict, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    ExcludeFilename,
    ExcludeExtension,
    ExcludeRegex,
    IncludeFilename,
    IncludeExtension,
    IncludeRegex,
    Shebang,
    Default,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::ExcludeFilename => "exclude-filename",
            RuleKind::ExcludeExtension => "exclude-extension",
            RuleKind::ExcludeRegex => "exclude-regex",
            RuleKind::IncludeFilename => "include-filename",
            RuleKind::IncludeExtension => "include-extension",
            RuleKind::IncludeRegex => "include-regex",
            RuleKind::Shebang => "shebang",
            RuleKind::Default => "default",
        }
    }
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verdict together with the rule that decided it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub verdict: Verdict,
    pub rule: RuleKind,
}

impl Decision {
    pub fn new(verdict: Verdict, rule: RuleKind) -> Self {
        Self { verdict, rule }
    }
}

/// Why a path would or would not end up in the artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    /// Path relative to root, using '/' as separator
    pub path: String,

    /// First ancestor directory listed in `exclude_dirs`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pruned_by: Option<String>,

    /// Classifier decision for the file name
    pub decision: Decision,

    /// Listed in `always_include_files`
    pub force_included: bool,

    /// Whether a pack run would write the file
    pub written: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_kind_order_matches_precedence() {
        assert!(RuleKind::ExcludeFilename < RuleKind::ExcludeExtension);
        assert!(RuleKind::ExcludeRegex < RuleKind::IncludeFilename);
        assert!(RuleKind::IncludeRegex < RuleKind::Shebang);
        assert!(RuleKind::Shebang < RuleKind::Default);
    }

    #[test]
    fn test_decision_serialization() {
        let decision = Decision::new(Verdict::Exclude, RuleKind::ExcludeFilename);
        let json = serde_json::to_string(&decision).unwrap();
        assert_eq!(json, r#"{"verdict":"exclude","rule":"exclude-filename"}"#);
    }

    #[test]
    fn test_explanation_skips_missing_prune() {
        let item = Explanation {
            path: "src/app/b.c".to_string(),
            pruned_by: None,
            decision: Decision::new(Verdict::Include, RuleKind::IncludeExtension),
            force_included: false,
            written: true,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("pruned_by"));
        assert!(json.contains("\"rule\":\"include-extension\""));
    }

    #[test]
    fn test_rule_kind_display() {
        assert_eq!(RuleKind::Shebang.to_string(), "shebang");
        assert_eq!(RuleKind::Default.as_str(), "default");
    }
}
