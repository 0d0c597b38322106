//! Suggested filename formatting.

use std::fmt;

use chrono::NaiveDate;

use crate::rules::dates::canonical_date;
use crate::rules::patterns::{UNSAFE_FILENAME_CHARS, WHITESPACE_RUN};

/// Extension used when none is configured.
pub const DEFAULT_EXTENSION: &str = "pdf";

/// Label used when a vendor match yields no usable text.
pub const UNKNOWN_VENDOR: &str = "Unknown";

/// A filename of the form `<YYYYMMDD> - <Vendor>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedFilename {
    pub date: NaiveDate,
    pub vendor: String,
    pub extension: String,
}

impl SuggestedFilename {
    pub fn new(date: NaiveDate, vendor: impl Into<String>) -> Self {
        Self {
            date,
            vendor: vendor.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Set the extension. A leading dot is ignored.
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// The date part, `YYYYMMDD`.
    pub fn date_stamp(&self) -> String {
        canonical_date(self.date)
    }
}

impl fmt::Display for SuggestedFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.date_stamp(), self.vendor)?;
        if !self.extension.is_empty() {
            write!(f, ".{}", self.extension)?;
        }
        Ok(())
    }
}

/// Make a vendor label safe to embed in a filename.
///
/// Whitespace runs (including OCR line breaks) collapse to one space and
/// path separators and other reserved characters become `_`.
pub fn sanitize_label(raw: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(raw.trim(), " ");
    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(&collapsed, "_");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        UNKNOWN_VENDOR.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 3, 5).unwrap()
    }

    #[test]
    fn test_display() {
        let name = SuggestedFilename::new(date(), "Google Cloud");
        assert_eq!(name.to_string(), "20230305 - Google Cloud.pdf");
    }

    #[test]
    fn test_custom_extension() {
        let name = SuggestedFilename::new(date(), "ACME").with_extension(".tiff");
        assert_eq!(name.to_string(), "20230305 - ACME.tiff");
    }

    #[test]
    fn test_empty_extension() {
        let name = SuggestedFilename::new(date(), "ACME").with_extension("");
        assert_eq!(name.to_string(), "20230305 - ACME");
    }

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label("  Google\n  Cloud "), "Google Cloud");
        assert_eq!(sanitize_label("AC/DC: Tours"), "AC_DC_ Tours");
        assert_eq!(sanitize_label("a\\b|c?d*e"), "a_b_c_d_e");
    }

    #[test]
    fn test_sanitize_empty_label() {
        assert_eq!(sanitize_label(""), UNKNOWN_VENDOR);
        assert_eq!(sanitize_label(" \n\t "), UNKNOWN_VENDOR);
    }
}
