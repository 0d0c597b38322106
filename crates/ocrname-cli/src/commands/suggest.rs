//! Suggest command - derive a filename from a single OCR text file.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use tracing::{debug, info, warn};

use ocrname_core::document::read_text;
use ocrname_core::RuleMatch;

use super::MatchReport;

/// Arguments for the suggest command.
#[derive(Args)]
pub struct SuggestArgs {
    /// OCR text file
    #[arg(required = true)]
    input: PathBuf,

    /// Rules file (JSON); defaults to rules.path from the config
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Reject the rule file if any pattern is invalid
    #[arg(long)]
    strict: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// The filename alone
    Text,
    /// JSON object with filename, date, vendor and rule index
    Json,
}

pub async fn run(args: SuggestArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    if args.strict {
        config.matching.strict = true;
    }

    let rules_path = super::rules_path(args.rules.as_deref(), &config)?;
    let matcher = super::build_matcher(&rules_path, &config)?;

    info!("Processing file: {}", args.input.display());
    let text = read_text(&args.input)
        .with_context(|| format!("reading OCR output {}", args.input.display()))?;

    if text.trim().is_empty() {
        warn!("{} contains no text", args.input.display());
    }

    let matched = matcher.match_text(&text).with_context(|| {
        format!(
            "{}: add a rule for this document to {}",
            args.input.display(),
            rules_path.display()
        )
    })?;

    println!("{}", format_match(&matched, args.format)?);

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_match(matched: &RuleMatch, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => matched.filename.to_string(),
        OutputFormat::Json => serde_json::to_string(&MatchReport::from(matched))?,
    })
}
