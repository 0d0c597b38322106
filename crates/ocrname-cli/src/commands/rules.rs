//! Rules command - inspect and validate rule files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};
use console::style;

use ocrname_core::RuleSet;

/// Arguments for the rules command.
#[derive(Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    command: RulesCommand,
}

#[derive(Subcommand)]
enum RulesCommand {
    /// Report every invalid pattern or date format
    Check {
        /// Rules file (JSON)
        file: PathBuf,
    },

    /// List rules in evaluation order
    Show {
        /// Rules file (JSON)
        file: PathBuf,
    },
}

pub async fn run(args: RulesArgs) -> anyhow::Result<()> {
    match args.command {
        RulesCommand::Check { file } => check_rules(&file),
        RulesCommand::Show { file } => show_rules(&file),
    }
}

fn load(file: &Path) -> anyhow::Result<RuleSet> {
    RuleSet::from_file(file).with_context(|| format!("loading rules {}", file.display()))
}

fn check_rules(file: &Path) -> anyhow::Result<()> {
    let rule_set = load(file)?;
    let problems = rule_set.validate();

    if problems.is_empty() {
        println!(
            "{} {} rules in {} are valid",
            style("✓").green(),
            rule_set.len(),
            file.display()
        );
        return Ok(());
    }

    for problem in &problems {
        println!("{} {}", style("✗").red(), problem);
    }

    anyhow::bail!(
        "{} invalid pattern(s) in {}",
        problems.len(),
        file.display()
    );
}

fn show_rules(file: &Path) -> anyhow::Result<()> {
    let rule_set = load(file)?;

    if rule_set.is_empty() {
        println!(
            "{} {} contains no rules; every document will be unmatched.",
            style("ℹ").blue(),
            file.display()
        );
        return Ok(());
    }

    for (index, rule) in rule_set.iter().enumerate() {
        println!("{}", style(format!("Rule #{}", index)).bold());
        println!("  vendor:     {}", rule.vendor_match_regex);
        println!("  additional: {}", rule.additional_match_regex);
        println!("  date:       {}", rule.date_extraction_regex);
        if let Some(label) = &rule.vendor_label {
            println!("  label:      {}", label);
        }
        if !rule.date_formats.is_empty() {
            println!("  formats:    {}", rule.date_formats.join(", "));
        }
    }

    Ok(())
}
