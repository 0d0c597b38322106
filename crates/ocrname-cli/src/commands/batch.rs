//! Batch command - suggest filenames for many OCR text files.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use ocrname_core::document::read_text;
use ocrname_core::{OcrNameError, RuleMatch, RuleMatcher};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for OCR text files (e.g. "scans/*.txt")
    #[arg(required = true)]
    input: String,

    /// Rules file (JSON); defaults to rules.path from the config
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Reject the rule file if any pattern is invalid
    #[arg(long)]
    strict: bool,

    /// Summary CSV path (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Continue when a file cannot be read
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome for a single file.
enum Outcome {
    Matched(RuleMatch),
    NoMatch,
    Failed(String),
}

struct FileResult {
    path: PathBuf,
    outcome: Outcome,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    if args.strict {
        config.matching.strict = true;
    }

    let rules_path = super::rules_path(args.rules.as_deref(), &config)?;
    let matcher = super::build_matcher(&rules_path, &config)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        let outcome = match process_single_file(&path, &matcher) {
            Ok(matched) => Outcome::Matched(matched),
            Err(e) if is_no_match(&e) => Outcome::NoMatch,
            Err(e) => {
                let message = format!("{:#}", e);
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), message);
                    Outcome::Failed(message)
                } else {
                    pb.abandon();
                    error!("Failed to process {}: {}", path.display(), message);
                    return Err(e);
                }
            }
        };

        results.push(FileResult { path, outcome });
        pb.inc(1);
    }

    pb.finish_and_clear();

    match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating summary {}", path.display()))?;
            write_summary(file, &results)?;
            eprintln!(
                "{} Summary written to {}",
                style("✓").green(),
                path.display()
            );
        }
        None => write_summary(io::stdout().lock(), &results)?,
    }

    let matched = results
        .iter()
        .filter(|r| matches!(r.outcome, Outcome::Matched(_)))
        .count();
    let unmatched = results
        .iter()
        .filter(|r| matches!(r.outcome, Outcome::NoMatch))
        .count();
    let failed = results.len() - matched - unmatched;

    eprintln!(
        "{} Processed {} files in {:?}: {} matched, {} unmatched, {} failed",
        style("✓").green(),
        results.len(),
        start.elapsed(),
        style(matched).green(),
        style(unmatched).yellow(),
        style(failed).red()
    );

    Ok(())
}

fn process_single_file(path: &Path, matcher: &RuleMatcher) -> anyhow::Result<RuleMatch> {
    let text = read_text(path).with_context(|| format!("reading OCR output {}", path.display()))?;
    let matched = matcher.match_text(&text)?;
    debug!("{} -> {}", path.display(), matched.filename);
    Ok(matched)
}

fn is_no_match(err: &anyhow::Error) -> bool {
    err.downcast_ref::<OcrNameError>()
        .is_some_and(OcrNameError::is_no_match)
}

fn write_summary<W: io::Write>(writer: W, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["file", "status", "filename", "rule_index", "error"])?;

    for result in results {
        let file = result.path.display().to_string();

        match &result.outcome {
            Outcome::Matched(matched) => wtr.write_record([
                file.as_str(),
                "matched",
                &matched.filename.to_string(),
                &matched.rule_index.to_string(),
                "",
            ])?,
            Outcome::NoMatch => {
                wtr.write_record([file.as_str(), "no_match", "", "", "no matching rule found"])?
            }
            Outcome::Failed(message) => {
                wtr.write_record([file.as_str(), "error", "", "", message.as_str()])?
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
