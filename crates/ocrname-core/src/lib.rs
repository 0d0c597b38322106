//! Core library for deriving standardized filenames from OCR text.
//!
//! This crate provides:
//! - Rule definitions loaded from JSON (vendor, additional and date patterns)
//! - Date extraction and canonicalization to `YYYYMMDD`
//! - An ordered, first-match-wins rule matcher
//! - Filename formatting (`<YYYYMMDD> - <Vendor>.pdf`)

pub mod config;
pub mod document;
pub mod error;
pub mod filename;
pub mod matcher;
pub mod rules;

pub use config::OcrNameConfig;
pub use error::{ConfigError, DateError, InputError, OcrNameError, Result};
pub use filename::SuggestedFilename;
pub use matcher::{apply_rules, RuleMatch, RuleMatcher};
pub use rules::{CompiledRule, Rule, RuleError, RuleField, RuleSet};
pub use rules::dates::{canonical_date, extract_date, extract_date_with};
