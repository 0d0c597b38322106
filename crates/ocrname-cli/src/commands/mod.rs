//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod rules;
pub mod suggest;

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use ocrname_core::{OcrNameConfig, RuleMatch, RuleMatcher, RuleSet};

/// Default configuration location, `<config dir>/ocrname/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ocrname")
        .join("config.json")
}

/// Resolve which config file a command works on.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load the configuration: an explicit path must exist, the default path is optional.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<OcrNameConfig> {
    if let Some(path) = config_path {
        return OcrNameConfig::from_file(Path::new(path))
            .with_context(|| format!("loading config {}", path));
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config {}", default_path.display());
        OcrNameConfig::from_file(&default_path)
            .with_context(|| format!("loading config {}", default_path.display()))
    } else {
        Ok(OcrNameConfig::default())
    }
}

/// Pick the rule file from the command line or the configuration.
pub fn rules_path(arg: Option<&Path>, config: &OcrNameConfig) -> anyhow::Result<PathBuf> {
    arg.map(Path::to_path_buf)
        .or_else(|| config.rules.path.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("No rules file given. Pass --rules or set rules.path in the config.")
        })
}

/// Load a rule file and build a matcher for it.
pub fn build_matcher(rules_path: &Path, config: &OcrNameConfig) -> anyhow::Result<RuleMatcher> {
    let rule_set = RuleSet::from_file(rules_path)
        .with_context(|| format!("loading rules {}", rules_path.display()))?;

    let matcher = config
        .matcher(&rule_set)
        .with_context(|| format!("compiling rules {}", rules_path.display()))?;

    if !matcher.skipped().is_empty() {
        warn!(
            "{} of {} rules in {} were skipped; run 'ocrname rules check' for details",
            matcher.skipped().len(),
            rule_set.len(),
            rules_path.display()
        );
    }

    Ok(matcher)
}

/// Machine-readable form of a match.
#[derive(Debug, Serialize)]
pub struct MatchReport<'a> {
    pub filename: String,
    pub date: NaiveDate,
    pub vendor: &'a str,
    pub rule_index: usize,
}

impl<'a> From<&'a RuleMatch> for MatchReport<'a> {
    fn from(matched: &'a RuleMatch) -> Self {
        Self {
            filename: matched.filename.to_string(),
            date: matched.date,
            vendor: &matched.vendor,
            rule_index: matched.rule_index,
        }
    }
}
