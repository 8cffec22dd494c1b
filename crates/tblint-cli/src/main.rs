//! tblint CLI tool.
//!
//! Usage:
//! ```bash
//! tblint check [OPTIONS] [FILES]... [-f FILE_LIST]
//! tblint list-linters
//! tblint list-rules
//! tblint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;
mod linters;

/// Documentation-conformance linter for SystemVerilog sources
#[derive(Parser)]
#[command(name = "tblint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "TBLINT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint files
    Check(commands::check::CheckArgs),

    /// List registered linters
    ListLinters,

    /// List rules with their effective configuration
    ListRules {
        /// Only list rules of this linter
        #[arg(short, long)]
        linter: Option<String>,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir()?;
    let source = config_resolver::resolve(&cwd, cli.config.as_deref());

    match cli.command {
        Commands::Check(args) => commands::check::run(&args, &source),
        Commands::ListLinters => commands::list_linters::run(&source),
        Commands::ListRules { linter } => commands::list_rules::run(linter.as_deref(), &source),
        Commands::Init { force } => {
            commands::init::run(&cwd, force)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
