//! Error types for the ocrname-core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::rules::RuleError;

/// Main error type for the ocrname library.
#[derive(Error, Debug)]
pub enum OcrNameError {
    /// Rule or settings configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Document text could not be obtained.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// Every rule was tried and none produced a filename.
    #[error("no matching rule found ({rules_tried} rules tried)")]
    NoMatch { rules_tried: usize },
}

impl OcrNameError {
    /// Whether this is the "tool worked but nothing matched" outcome.
    pub fn is_no_match(&self) -> bool {
        matches!(self, OcrNameError::NoMatch { .. })
    }
}

/// Errors related to loading rules and settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or has the wrong structure.
    #[error("failed to parse {origin}: {message}")]
    Parse { origin: String, message: String },

    /// A rule carries an invalid pattern or date format.
    #[error(transparent)]
    InvalidRule(#[from] RuleError),

    /// A settings value is out of range.
    #[error("invalid settings: {0}")]
    Settings(String),
}

/// Errors related to reading the OCR text of a document.
#[derive(Error, Debug)]
pub enum InputError {
    /// The text file is missing or unreadable.
    #[error("failed to read OCR text from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-rule date extraction failures. The matcher recovers from these by
/// moving on to the next rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The extraction pattern found nothing in the text.
    #[error("date not found")]
    NotFound,

    /// The pattern matched but capture group 1 did not participate.
    #[error("date pattern has no capture group")]
    MissingCapture,

    /// The extraction pattern does not compile.
    #[error("invalid date pattern: {0}")]
    InvalidPattern(String),

    /// The captured text does not parse under any candidate format.
    #[error("could not parse {value:?} as a date (tried {formats:?})")]
    Unparseable { value: String, formats: Vec<String> },
}

/// Result type for the ocrname library.
pub type Result<T> = std::result::Result<T, OcrNameError>;
