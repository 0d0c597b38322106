//! Ordered, first-match-wins rule evaluation.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, OcrNameError, Result};
use crate::filename::{SuggestedFilename, DEFAULT_EXTENSION};
use crate::rules::dates::DEFAULT_DATE_FORMAT;
use crate::rules::{CompiledRule, Rule, RuleError, RuleSet};

/// Outcome of a successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    /// Zero-based index of the winning rule in the rule set.
    pub rule_index: usize,
    pub date: NaiveDate,
    pub vendor: String,
    pub filename: SuggestedFilename,
}

/// Matches OCR text against an ordered rule set.
///
/// The matcher holds only immutable compiled state and can be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct RuleMatcher {
    rules: Vec<CompiledRule>,
    skipped: Vec<RuleError>,
    total: usize,
    default_formats: Vec<String>,
    extension: String,
}

impl RuleMatcher {
    /// Build a matcher that skips rules with invalid patterns.
    pub fn new(rule_set: &RuleSet) -> Self {
        Self::from_rules(rule_set.iter())
    }

    /// Like [`RuleMatcher::new`], over borrowed rules in evaluation order.
    pub fn from_rules<'a, I>(rules: I) -> Self
    where
        I: IntoIterator<Item = &'a Rule>,
    {
        let mut compiled = Vec::new();
        let mut skipped = Vec::new();
        let mut total = 0;

        for (index, rule) in rules.into_iter().enumerate() {
            total += 1;
            match CompiledRule::compile(index, rule) {
                Ok(rule) => compiled.push(rule),
                Err(e) => {
                    warn!("Skipping {}", e);
                    skipped.push(e);
                }
            }
        }

        Self::from_parts(compiled, skipped, total)
    }

    /// Build a matcher that rejects the rule set if any rule is invalid.
    pub fn strict(rule_set: &RuleSet) -> std::result::Result<Self, ConfigError> {
        let rules = rule_set
            .iter()
            .enumerate()
            .map(|(index, rule)| CompiledRule::compile(index, rule))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self::from_parts(rules, Vec::new(), rule_set.len()))
    }

    fn from_parts(rules: Vec<CompiledRule>, skipped: Vec<RuleError>, total: usize) -> Self {
        Self {
            rules,
            skipped,
            total,
            default_formats: vec![DEFAULT_DATE_FORMAT.to_string()],
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Set the date formats used by rules without their own. Empty keeps the current ones.
    pub fn with_default_date_formats(mut self, formats: Vec<String>) -> Self {
        if !formats.is_empty() {
            self.default_formats = formats;
        }
        self
    }

    /// Set the extension of suggested filenames.
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.to_string();
        self
    }

    /// Rules dropped at construction because they failed to compile.
    pub fn skipped(&self) -> &[RuleError] {
        &self.skipped
    }

    /// Number of rules that take part in matching.
    pub fn active_rules(&self) -> usize {
        self.rules.len()
    }

    /// Find the first rule whose vendor and additional patterns match and
    /// whose date extraction succeeds.
    pub fn match_text(&self, text: &str) -> Result<RuleMatch> {
        for rule in &self.rules {
            let index = rule.index();

            let Some(vendor_caps) = rule.vendor_match(text) else {
                debug!("Rule #{}: vendor pattern did not match", index);
                continue;
            };

            if !rule.additional_matches(text) {
                debug!("Rule #{}: additional pattern did not match", index);
                continue;
            }

            let date = match rule.extract_date(text, &self.default_formats) {
                Ok(date) => date,
                Err(e) => {
                    debug!("Rule #{}: {}, trying next rule", index, e);
                    continue;
                }
            };

            let vendor = rule.vendor_label(&vendor_caps);
            let filename =
                SuggestedFilename::new(date, vendor.clone()).with_extension(&self.extension);
            info!("Rule #{} matched: {}", index, filename);

            return Ok(RuleMatch {
                rule_index: index,
                date,
                vendor,
                filename,
            });
        }

        Err(OcrNameError::NoMatch {
            rules_tried: self.total,
        })
    }
}

/// Apply `rules` to `text` and return the suggested filename.
///
/// Rules with invalid patterns are skipped.
pub fn apply_rules(text: &str, rules: &[Rule]) -> Result<String> {
    let matched = RuleMatcher::from_rules(rules).match_text(text)?;
    Ok(matched.filename.to_string())
}
