//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CacheCommand, CompletionsCommand, InspectLogCommand, RunCommand, ValidateCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for reconciling live drive listings against a
/// migration log.
#[derive(Parser)]
#[command(name = "migmap")]
#[command(
    version,
    about = "Reconcile live drive listings against a migration log",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "MIGMAP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Match every principal's live items against the migration log
    Run(RunCommand),

    /// Load and index the migration log without fetching anything
    InspectLog(InspectLogCommand),

    /// Inspect or clear the listing cache
    Cache(CacheCommand),

    /// Validate a configuration file
    Validate(ValidateCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
