//! CLI application that suggests filenames for scanned documents.

mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use ocrname_core::OcrNameError;

use commands::{batch, config, rules, suggest};

/// Exit status when the tool worked but no rule matched.
const EXIT_NO_MATCH: u8 = 2;

/// ocrname - Suggest "<YYYYMMDD> - <Vendor>.pdf" filenames from OCR text
#[derive(Parser)]
#[command(name = "ocrname")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest a filename for a single OCR text file
    Suggest(suggest::SuggestArgs),

    /// Suggest filenames for many OCR text files
    Batch(batch::BatchArgs),

    /// Inspect and validate rule files
    Rules(rules::RulesArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // Logs go to stderr so stdout only carries results
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to initialise logging: {}", e);
    }

    // Execute command
    let result = match cli.command {
        Commands::Suggest(args) => suggest::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Rules(args) => rules::run(args).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", style("✗").red(), err);
            exit_code(&err)
        }
    }
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<OcrNameError>() {
        Some(e) if e.is_no_match() => ExitCode::from(EXIT_NO_MATCH),
        _ => ExitCode::FAILURE,
    }
}
