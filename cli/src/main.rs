//! docfill CLI - DOCX template filling tool
//!
//! Fills `{{placeholder}}` tokens in Word documents, either from the command
//! line or through a small HTTP service.

mod serve;

use clap::{Parser, Subcommand};
use colored::*;
use docfill::{ReplacementMap, RewriteOptions};
use indicatif::{ProgressBar, ProgressStyle};
use serve::ServeConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Fill placeholders in Word document templates
#[derive(Parser)]
#[command(
    name = "docfill",
    author = "iyulab",
    version,
    about = "Fill placeholders in DOCX templates",
    long_about = "docfill - Placeholder substitution for Word documents.\n\n\
                  Replaces {{identifier}} tokens in word/document.xml and copies\n\
                  every other package entry unchanged."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill a template file and write the generated document
    Files {
        /// Template file path
        input: PathBuf,

        /// Output file path
        output: PathBuf,

        /// JSON file with replacements (default: built-in sample values)
        #[arg(short, long)]
        replacements: Option<PathBuf>,

        /// Deflate level for compressed entries (0-9)
        #[arg(long)]
        compression_level: Option<i64>,
    },

    /// Serve the template endpoint over HTTP
    Serve {
        /// Listen address
        #[arg(long, env = "DOCFILL_ADDR", default_value = "127.0.0.1:4222")]
        addr: String,

        /// Maximum upload size in bytes
        #[arg(long, env = "DOCFILL_MAX_UPLOAD", default_value_t = 5 << 20)]
        max_upload: usize,
    },

    /// List the placeholders in a template
    Placeholders {
        /// Template file path
        input: PathBuf,

        /// Output as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Files {
            input,
            output,
            replacements,
            compression_level,
        } => {
            let replacements = match replacements {
                Some(path) => load_replacements(&path)?,
                None => default_replacements(),
            };

            let mut options = RewriteOptions::new().with_log_unresolved(true);
            if let Some(level) = compression_level {
                options = options.with_compression_level(level);
            }

            let pb = create_spinner("Filling template...");
            let report = docfill::rewrite_file(&input, &output, &replacements, &options)?;
            pb.finish_and_clear();

            println!(
                "{} Wrote {} ({} entries, {} placeholders filled)",
                "✓".green().bold(),
                output.display(),
                report.entries,
                report.resolved
            );
            if !report.body_found {
                println!(
                    "{} No {} in template; copied unchanged",
                    "!".yellow().bold(),
                    docfill::BODY_PART
                );
            }
            if !report.unresolved.is_empty() {
                println!(
                    "{} Unresolved placeholders: {}",
                    "!".yellow().bold(),
                    report.unresolved.join(", ")
                );
            }
        }

        Commands::Serve { addr, max_upload } => {
            let config = ServeConfig { addr, max_upload };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(serve::run(config))?;
        }

        Commands::Placeholders { input, json } => {
            let package = docfill::open_package(fs::read(&input)?)?;
            if !docfill::is_word_document(&package)? {
                eprintln!(
                    "{} {} does not declare a Word main document",
                    "!".yellow().bold(),
                    input.display()
                );
            }
            let names = docfill::placeholders(&package.body()?);

            if json {
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else if names.is_empty() {
                println!("{} No placeholders found", "!".yellow().bold());
            } else {
                for name in &names {
                    println!("{}", name);
                }
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

/// Sample values used by `files` when no replacements file is given.
fn default_replacements() -> ReplacementMap {
    [
        ("Title", "something..."),
        (
            "more_text",
            "Once upon a time there was a Rust program that could template docx documents...",
        ),
        ("even_more_text", "This is an item"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn load_replacements(path: &Path) -> Result<ReplacementMap, Box<dyn std::error::Error>> {
    let data = fs::read(path)?;
    Ok(docfill::parse_replacements(&data)?)
}

fn print_version() {
    println!("{} {}", "docfill".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Placeholder substitution for Word document templates");
    println!();
    println!("Supported formats: DOCX");
    println!("Repository: https://github.com/iyulab/docfill");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
