//! Rules with their patterns compiled, ready for matching.

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use regex::{Captures, Regex};

use super::dates::extract_date;
use super::{Rule, RuleError, RuleField};
use crate::error::DateError;
use crate::filename::sanitize_label;

/// Name of the optional capture group in the vendor pattern that supplies the label.
pub const VENDOR_GROUP: &str = "vendor";

/// A [`Rule`] whose patterns have been compiled and checked.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    index: usize,
    vendor: Regex,
    additional: Regex,
    date: Regex,
    vendor_label: Option<String>,
    date_formats: Vec<String>,
}

impl CompiledRule {
    /// Compile a rule, failing on the first invalid pattern or format.
    pub fn compile(index: usize, rule: &Rule) -> Result<Self, RuleError> {
        let vendor = compile_pattern(index, RuleField::VendorMatch, &rule.vendor_match_regex)?;
        let additional =
            compile_pattern(index, RuleField::AdditionalMatch, &rule.additional_match_regex)?;
        let date = compile_pattern(index, RuleField::DateExtraction, &rule.date_extraction_regex)?;
        check_date_formats(index, &rule.date_formats)?;

        let vendor_label = rule
            .vendor_label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string);

        Ok(Self {
            index,
            vendor,
            additional,
            date,
            vendor_label,
            date_formats: rule.date_formats.clone(),
        })
    }

    /// Position of this rule in its rule set.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Find the vendor pattern anywhere in the text.
    pub fn vendor_match<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        self.vendor.captures(text)
    }

    /// Whether the additional pattern matches anywhere in the text.
    pub fn additional_matches(&self, text: &str) -> bool {
        self.additional.is_match(text)
    }

    /// Extract the date, falling back to `default_formats` when the rule has none of its own.
    pub fn extract_date(
        &self,
        text: &str,
        default_formats: &[String],
    ) -> Result<NaiveDate, DateError> {
        let formats = if self.date_formats.is_empty() {
            default_formats
        } else {
            self.date_formats.as_slice()
        };
        extract_date(text, &self.date, formats)
    }

    /// Label for the filename: explicit label, then the `vendor` group, then the whole match.
    pub fn vendor_label(&self, vendor_caps: &Captures<'_>) -> String {
        if let Some(label) = &self.vendor_label {
            return sanitize_label(label);
        }

        let raw = vendor_caps
            .name(VENDOR_GROUP)
            .map(|m| m.as_str())
            .filter(|s| !s.trim().is_empty())
            .or_else(|| vendor_caps.get(0).map(|m| m.as_str()))
            .unwrap_or_default();

        sanitize_label(raw)
    }
}

pub(super) fn compile_pattern(
    index: usize,
    field: RuleField,
    pattern: &str,
) -> Result<Regex, RuleError> {
    let regex = Regex::new(pattern).map_err(|e| RuleError {
        index,
        field,
        message: e.to_string(),
    })?;

    // Group 0 plus at least one explicit group.
    if field == RuleField::DateExtraction && regex.captures_len() < 2 {
        return Err(RuleError {
            index,
            field,
            message: "pattern has no capture group".to_string(),
        });
    }

    Ok(regex)
}

pub(super) fn check_date_formats(index: usize, formats: &[String]) -> Result<(), RuleError> {
    for format in formats {
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(RuleError {
                index,
                field: RuleField::DateFormats,
                message: format!("unsupported date format {:?}", format),
            });
        }
    }
    Ok(())
}
