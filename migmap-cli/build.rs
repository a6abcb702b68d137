//! Build script for migmap-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
fn build_cli() -> Command {
    Command::new("migmap")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reconcile live drive listings against a migration log")
        .long_about(
            "Command-line tool that matches every live item of every principal against \
             the rows of a migration log and writes the matched items to a dataset",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("MIGMAP_DATA_DIR"),
        )
        .subcommands(vec![
            Command::new("run")
                .about("Match every principal's live items against the migration log")
                .long_about(
                    "Fetch each principal's listing, resolve full paths, match them against \
                     the migration log and write the dataset",
                ),
            Command::new("inspect-log")
                .about("Load and index the migration log without fetching anything")
                .long_about("Report row counts, collisions and unrecognized types of a migration log"),
            Command::new("cache")
                .about("Inspect or clear the listing cache")
                .long_about("List or remove listings cached between runs"),
            Command::new("validate")
                .about("Validate a configuration file")
                .long_about("Check a migmap configuration file for errors"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("migmap.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
