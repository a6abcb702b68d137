//! Inspect-log command implementation.
//!
//! This module implements the `inspect-log` command, which loads and
//! indexes the migration log without touching any live listing. It is the
//! quickest way to see how many rows a log yields and where they collide.

use crate::commands::run::OutputFormat;
use crate::error::CliError;
use crate::utils::{load_configuration, shorten_path, GlobalOptions};
use clap::Args;
use migmap::reconcile::Collision;
use migmap::{Config, CsvLogLoader, MigrationLogLoader, ReconciliationIndex};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Load and index the migration log.
#[derive(Args)]
pub struct InspectLogCommand {
    /// Migration log CSV to inspect
    #[arg(long = "log", value_name = "PATH")]
    pub migration_log: Option<PathBuf>,

    /// Destination folder the migration copied into
    #[arg(long, value_name = "PATH")]
    pub root_path: Option<String>,

    /// List every principal found in the log
    #[arg(long)]
    pub list_principals: bool,

    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "human",
        env = "MIGMAP_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: OutputFormat,
}

/// What indexing the log produced.
#[derive(Debug, Serialize)]
struct LogReport {
    path: String,
    invalid_rows: usize,
    quarantined_rows: usize,
    indexed_rows: usize,
    key_count: usize,
    principal_count: usize,
    likely_root_folders: usize,
    unrecognized_types: BTreeMap<String, usize>,
    collisions: Vec<CollisionRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    principals: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct CollisionRow {
    principal: String,
    destination_type: String,
    full_path: String,
    kept_row: usize,
    discarded_row: usize,
}

impl From<&Collision> for CollisionRow {
    fn from(collision: &Collision) -> Self {
        Self {
            principal: collision.key.principal().to_string(),
            destination_type: collision.key.destination_type().to_string(),
            full_path: collision.key.full_path().to_string(),
            kept_row: collision.kept_row,
            discarded_row: collision.discarded_row,
        }
    }
}

impl InspectLogCommand {
    /// Execute the inspect-log command.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(
            global,
            Config {
                migration_log: self.migration_log.clone(),
                root_destination_path: self.root_path.clone(),
                ..Config::default()
            },
        )?;

        let path = config.migration_log_path();
        let log = CsvLogLoader::new(&path).load_rows()?;
        let invalid_rows = log.invalid_rows;
        let (entries, quarantined_rows) = log.into_entries();
        let index = ReconciliationIndex::build(entries, config.index_options());

        let report = LogReport {
            path: shorten_path(&path),
            invalid_rows,
            quarantined_rows,
            indexed_rows: index.total_rows(),
            key_count: index.len(),
            principal_count: index.principals().len(),
            likely_root_folders: index
                .entries()
                .filter(|entry| index.is_likely_root_folder(entry))
                .count(),
            unrecognized_types: index.unrecognized_types().clone(),
            collisions: index.collisions().iter().map(CollisionRow::from).collect(),
            principals: self
                .list_principals
                .then(|| index.principals().to_vec()),
        };

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Human => print_human(&report),
        }
        Ok(())
    }
}

fn print_human(report: &LogReport) {
    println!("Log:               {}", report.path);
    println!("Invalid rows:      {}", report.invalid_rows);
    println!("Quarantined rows:  {}", report.quarantined_rows);
    println!("Indexed rows:      {}", report.indexed_rows);
    println!("Distinct keys:     {}", report.key_count);
    println!("Principals:        {}", report.principal_count);
    println!("Root folder rows:  {}", report.likely_root_folders);

    for (kind, count) in &report.unrecognized_types {
        println!("Unrecognized type: {kind} ({count} rows)");
    }

    if !report.collisions.is_empty() {
        println!("Collisions:        {}", report.collisions.len());
        for collision in &report.collisions {
            println!(
                "  {} {} {}: row {} replaces row {}",
                collision.principal,
                collision.destination_type,
                collision.full_path,
                collision.kept_row,
                collision.discarded_row
            );
        }
    }

    if let Some(ref principals) = report.principals {
        for principal in principals {
            println!("  {principal}");
        }
    }
}
