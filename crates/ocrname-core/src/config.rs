//! Configuration structures for the ocrname tool.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::filename::DEFAULT_EXTENSION;
use crate::matcher::RuleMatcher;
use crate::rules::dates::DEFAULT_DATE_FORMAT;
use crate::rules::RuleSet;

/// Main configuration for ocrname.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrNameConfig {
    /// Rule file location.
    pub rules: RulesConfig,

    /// Matching behaviour.
    pub matching: MatchingConfig,

    /// Suggested filename output.
    pub output: OutputConfig,
}

/// Where rules are loaded from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Rule file used when none is given on the command line.
    pub path: Option<PathBuf>,
}

/// Rule matching configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Reject the whole rule set if any pattern is invalid, instead of
    /// skipping the offending rule.
    pub strict: bool,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Extension of suggested filenames.
    pub extension: String,

    /// Date formats for rules that do not list their own.
    pub default_date_formats: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            default_date_formats: vec![DEFAULT_DATE_FORMAT.to_string()],
        }
    }
}

impl OcrNameConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            origin: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            origin: path.display().to_string(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let extension = self.output.extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains(['/', '\\']) {
            return Err(ConfigError::Settings(format!(
                "output.extension {:?} is not a valid file extension",
                self.output.extension
            )));
        }

        for format in &self.output.default_date_formats {
            if chrono::format::StrftimeItems::new(format)
                .any(|item| matches!(item, chrono::format::Item::Error))
            {
                return Err(ConfigError::Settings(format!(
                    "output.default_date_formats contains unsupported format {:?}",
                    format
                )));
            }
        }

        Ok(())
    }

    /// Build a matcher for `rule_set` according to these settings.
    pub fn matcher(&self, rule_set: &RuleSet) -> Result<RuleMatcher, ConfigError> {
        let matcher = if self.matching.strict {
            RuleMatcher::strict(rule_set)?
        } else {
            RuleMatcher::new(rule_set)
        };

        Ok(matcher
            .with_default_date_formats(self.output.default_date_formats.clone())
            .with_extension(&self.output.extension))
    }
}
