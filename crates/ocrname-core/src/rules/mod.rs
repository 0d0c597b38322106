//! Filename rules and their JSON representation.

mod compiled;
pub mod dates;
pub mod patterns;

pub use compiled::CompiledRule;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::ConfigError;

/// A single rule: how to recognize a document and where its date lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Must match somewhere in the text for the rule to be considered.
    pub vendor_match_regex: String,

    /// Secondary pattern that must also match (document type, sub-vendor).
    pub additional_match_regex: String,

    /// Pattern whose capture group 1 yields the date text.
    pub date_extraction_regex: String,

    /// Literal vendor label for the filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_label: Option<String>,

    /// Candidate chrono formats for the captured date, tried in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub date_formats: Vec<String>,
}

impl Rule {
    pub fn new(
        vendor_match_regex: impl Into<String>,
        additional_match_regex: impl Into<String>,
        date_extraction_regex: impl Into<String>,
    ) -> Self {
        Self {
            vendor_match_regex: vendor_match_regex.into(),
            additional_match_regex: additional_match_regex.into(),
            date_extraction_regex: date_extraction_regex.into(),
            vendor_label: None,
            date_formats: Vec::new(),
        }
    }

    /// Set a literal vendor label.
    pub fn with_vendor_label(mut self, label: impl Into<String>) -> Self {
        self.vendor_label = Some(label.into());
        self
    }

    /// Set the candidate date formats.
    pub fn with_date_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_formats = formats.into_iter().map(Into::into).collect();
        self
    }

    /// Collect every problem with this rule, not just the first.
    pub fn problems(&self, index: usize) -> Vec<RuleError> {
        let mut problems = Vec::new();

        for (field, pattern) in [
            (RuleField::VendorMatch, &self.vendor_match_regex),
            (RuleField::AdditionalMatch, &self.additional_match_regex),
            (RuleField::DateExtraction, &self.date_extraction_regex),
        ] {
            if let Err(e) = compiled::compile_pattern(index, field, pattern) {
                problems.push(e);
            }
        }

        if let Err(e) = compiled::check_date_formats(index, &self.date_formats) {
            problems.push(e);
        }

        problems
    }
}

/// Names a rule field in error messages, using its JSON key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleField {
    VendorMatch,
    AdditionalMatch,
    DateExtraction,
    DateFormats,
}

impl fmt::Display for RuleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            RuleField::VendorMatch => "vendorMatchRegex",
            RuleField::AdditionalMatch => "additionalMatchRegex",
            RuleField::DateExtraction => "dateExtractionRegex",
            RuleField::DateFormats => "dateFormats",
        };
        f.write_str(key)
    }
}

/// An invalid pattern or format in one rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("rule #{index}: invalid {field}: {message}")]
pub struct RuleError {
    /// Zero-based position of the rule in the rule set.
    pub index: usize,
    pub field: RuleField,
    pub message: String,
}

/// Ordered rule collection. The first rule that fully succeeds wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Load a rule set from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse a rule set from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::parse(json, "rule set")
    }

    fn parse(json: &str, origin: &str) -> Result<Self, ConfigError> {
        let rule_set: RuleSet = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })?;
        debug!("Loaded {} rules from {}", rule_set.len(), origin);
        Ok(rule_set)
    }

    /// Every invalid pattern or date format across all rules.
    pub fn validate(&self) -> Vec<RuleError> {
        self.rules
            .iter()
            .enumerate()
            .flat_map(|(index, rule)| rule.problems(index))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        Self::new(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RULES_JSON: &str = r#"{
        "rules": [
            {
                "vendorMatchRegex": "Google Cloud",
                "additionalMatchRegex": "Invoice",
                "dateExtractionRegex": "Date: ([A-Za-z]+ \\d{1,2}, \\d{4})"
            },
            {
                "vendorMatchRegex": "ACME",
                "additionalMatchRegex": "Receipt",
                "dateExtractionRegex": "on (\\d{2}/\\d{2}/\\d{4})",
                "vendorLabel": "Acme Corp",
                "dateFormats": ["%d/%m/%Y"]
            }
        ]
    }"#;

    #[test]
    fn test_parse_rule_set() {
        let rule_set = RuleSet::from_json(RULES_JSON).unwrap();

        assert_eq!(rule_set.len(), 2);
        assert_eq!(
            rule_set.rules[0],
            Rule::new("Google Cloud", "Invoice", r"Date: ([A-Za-z]+ \d{1,2}, \d{4})")
        );
        assert_eq!(
            rule_set.rules[1],
            Rule::new("ACME", "Receipt", r"on (\d{2}/\d{2}/\d{4})")
                .with_vendor_label("Acme Corp")
                .with_date_formats(["%d/%m/%Y"])
        );
    }

    #[test]
    fn test_parse_empty_rule_list() {
        let rule_set = RuleSet::from_json(r#"{"rules": []}"#).unwrap();
        assert!(rule_set.is_empty());
    }

    #[test]
    fn test_parse_missing_rules_key() {
        let err = RuleSet::from_json(r#"{"patterns": []}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_parse_missing_field() {
        let err = RuleSet::from_json(
            r#"{"rules": [{"vendorMatchRegex": "A", "additionalMatchRegex": "B"}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("dateExtractionRegex"));
    }

    #[test]
    fn test_parse_malformed_json() {
        assert!(RuleSet::from_json("{ not json").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, RULES_JSON).unwrap();

        let rule_set = RuleSet::from_file(&path).unwrap();
        assert_eq!(rule_set.len(), 2);
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = RuleSet::from_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let rule_set = RuleSet::new(vec![
            Rule::new("Google", "Invoice", r"Date: (.+)"),
            Rule::new("(unclosed", "Invoice", r"Date: (.+)"),
            Rule::new("ACME", "[z-a]", r"Date: .+").with_date_formats(["%Q"]),
        ]);

        let problems = rule_set.validate();
        let summary: Vec<_> = problems.iter().map(|p| (p.index, p.field)).collect();

        assert_eq!(
            summary,
            vec![
                (1, RuleField::VendorMatch),
                (2, RuleField::AdditionalMatch),
                (2, RuleField::DateExtraction),
                (2, RuleField::DateFormats),
            ]
        );
    }

    #[test]
    fn test_rule_error_display() {
        let err = RuleError {
            index: 3,
            field: RuleField::DateExtraction,
            message: "pattern has no capture group".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "rule #3: invalid dateExtractionRegex: pattern has no capture group"
        );
    }

    #[test]
    fn test_serialize_skips_optional_fields() {
        let json = serde_json::to_string(&Rule::new("A", "B", "(C)")).unwrap();
        assert_eq!(
            json,
            r#"{"vendorMatchRegex":"A","additionalMatchRegex":"B","dateExtractionRegex":"(C)"}"#
        );
    }
}
