//! Command-line interface for hooksmith.
//!
//! Uses clap for argument parsing; each command lives in its own module
//! under `commands/`.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod output;

pub use output::Output;

use crate::scan::ScanMode;

/// hooksmith - language-aware pre-commit configuration and security scans
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable quiet output (minimal)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Detect languages and install tailored pre-commit hooks
    Init {
        /// Disregard any existing configuration and start fresh
        #[arg(long)]
        reset: bool,

        /// Assume "yes" to all prompts
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Run security scans over staged or all repository files
    Scan {
        /// Which files to scan
        #[arg(long, value_enum, default_value = "staged")]
        mode: ScanModeArg,

        /// Assume "yes" to all prompts
        #[arg(short = 'y', long)]
        yes: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: ScanFormat,
    },
    /// Refresh hook environments, optionally bumping pinned revisions
    Update {
        /// Update hook repositories to their latest revisions
        #[arg(long)]
        latest: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScanModeArg {
    Staged,
    AllFiles,
}

impl From<ScanModeArg> for ScanMode {
    fn from(arg: ScanModeArg) -> Self {
        match arg {
            ScanModeArg::Staged => ScanMode::Staged,
            ScanModeArg::AllFiles => ScanMode::AllFiles,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScanFormat {
    Text,
    Json,
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let output = Output::new(self.verbose, self.quiet);

        match self.command {
            Commands::Init { reset, yes } => commands::init::execute(reset, yes, &output).await,
            Commands::Scan { mode, yes, format } => {
                commands::scan::execute(mode.into(), yes, format, &output).await
            }
            Commands::Update { latest } => commands::update::execute(latest, &output).await,
        }
    }
}
