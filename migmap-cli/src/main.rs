//! Main entry point for the migmap CLI.
//!
//! This is the command-line interface for the migmap reconciliation engine.
//! It provides commands for:
//! - `run`: Match live items against the migration log and write the dataset
//! - `inspect-log`: Index the migration log and report on it
//! - `cache`: List or clear cached listings
//! - `validate`: Validate a configuration file
//! - `completions`: Generate shell completion scripts

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    migmap::init_logger(cli.verbose, cli.quiet).install();

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
    };

    let result = match cli.command {
        cli::Command::Run(cmd) => cmd.execute(&global),
        cli::Command::InspectLog(cmd) => cmd.execute(&global),
        cli::Command::Cache(cmd) => cmd.execute(&global),
        cli::Command::Validate(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
