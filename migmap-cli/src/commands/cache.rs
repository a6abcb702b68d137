//! Cache command implementation.
//!
//! This module implements the `cache` command group for looking at and
//! clearing the listings stored between runs.

use crate::commands::run::OutputFormat;
use crate::error::CliError;
use crate::utils::{
    format_timestamp, load_configuration, open_cache, resolve_database_path, shorten_path,
    GlobalOptions,
};
use clap::{Args, Subcommand};
use migmap::Config;
use serde::Serialize;

/// Inspect or clear the listing cache.
#[derive(Args)]
pub struct CacheCommand {
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands.
#[derive(Subcommand)]
pub enum CacheAction {
    /// List cached listings
    List {
        /// Output format
        #[arg(
            long,
            value_enum,
            default_value = "human",
            env = "MIGMAP_OUTPUT_FORMAT",
            ignore_case = true
        )]
        format: OutputFormat,
    },

    /// Remove cached listings
    Clear {
        /// Only remove listings fetched with this query fingerprint
        #[arg(long, value_name = "FINGERPRINT")]
        fingerprint: Option<String>,
    },
}

#[derive(Debug, Serialize)]
struct EntryRow {
    fingerprint: String,
    principal: String,
    item_count: usize,
    created_at: String,
}

impl CacheCommand {
    /// Execute the cache command.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        let db_path = resolve_database_path(global)?;
        let exists = db_path.exists();

        match &self.action {
            CacheAction::List { format } => {
                let rows = if exists {
                    let config = load_configuration(global, Config::default())?;
                    open_cache(global, &config)?
                        .list_entries()?
                        .into_iter()
                        .map(|entry| EntryRow {
                            fingerprint: entry.fingerprint,
                            principal: entry.principal,
                            item_count: entry.item_count,
                            created_at: format_timestamp(entry.created_at),
                        })
                        .collect()
                } else {
                    Vec::new()
                };
                print_entries(*format, &rows, global)?;
            }
            CacheAction::Clear { fingerprint } => {
                if !exists {
                    if !global.quiet {
                        println!("No cache at {}", shorten_path(&db_path));
                    }
                    return Ok(());
                }
                let config = load_configuration(global, Config::default())?;
                let removed = open_cache(global, &config)?.clear(fingerprint.as_deref())?;
                if !global.quiet {
                    println!("Removed {removed} cached listing(s)");
                }
            }
        }
        Ok(())
    }
}

fn print_entries(
    format: OutputFormat,
    rows: &[EntryRow],
    global: &GlobalOptions,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Human => {
            if rows.is_empty() {
                if !global.quiet {
                    println!("No cached listings");
                }
                return Ok(());
            }
            println!(
                "{:<16}  {:<32}  {:>6}  CREATED",
                "FINGERPRINT", "PRINCIPAL", "ITEMS"
            );
            for row in rows {
                let short: String = row.fingerprint.chars().take(16).collect();
                println!(
                    "{:<16}  {:<32}  {:>6}  {}",
                    short, row.principal, row.item_count, row.created_at
                );
            }
        }
    }
    Ok(())
}
