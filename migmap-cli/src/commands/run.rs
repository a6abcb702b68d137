//! Run command implementation.
//!
//! This module implements the `run` command, which matches every
//! principal's live listing against the migration log and writes the
//! matched items to the output dataset.

use crate::error::CliError;
use crate::utils::{load_configuration, open_cache, shorten_path, GlobalOptions};
use clap::{Args, ValueEnum};
use migmap::{
    CacheStore, Config, CsvLogLoader, CsvOutputSink, DirectorySource, NoCache, Pipeline, Summary,
};
use std::path::PathBuf;

/// Match live listings against the migration log.
#[derive(Args)]
pub struct RunCommand {
    /// Directory holding the exported listings, one set of files per principal
    #[arg(long, value_name = "DIR")]
    pub items_dir: Option<PathBuf>,

    /// Migration log CSV to reconcile against
    #[arg(long = "log", value_name = "PATH")]
    pub migration_log: Option<PathBuf>,

    /// Dataset CSV to write
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Append to an existing dataset instead of replacing it
    #[arg(long)]
    pub append: bool,

    /// Destination folder the migration copied into, e.g. "/Migrated"
    #[arg(long, value_name = "PATH")]
    pub root_path: Option<String>,

    /// Number of principals processed at once
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Highest copy number tried when a path is not found as-is
    #[arg(long, value_name = "N")]
    pub max_copy_number: Option<u32>,

    /// Always fetch listings from the source
    #[arg(long)]
    pub no_cache: bool,

    /// Log principals by position instead of by address
    #[arg(long)]
    pub redact_principals: bool,

    /// List every unmatched log row after the summary
    #[arg(long)]
    pub show_unmatched: bool,

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

/// Output format for reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned text for people
    Human,
    /// Pretty-printed JSON
    Json,
}

impl RunCommand {
    /// Execute the run command.
    pub fn execute(&self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global, self.overrides())?;

        let items_dir = config.items_dir.clone().ok_or_else(|| {
            CliError::InvalidArguments(
                "no items directory configured (use --items-dir or set items_dir)".into(),
            )
        })?;
        if !items_dir.is_dir() {
            return Err(CliError::InvalidArguments(format!(
                "items directory {} does not exist",
                items_dir.display()
            )));
        }

        let output_path = config.output_path();
        let sink = if self.append {
            CsvOutputSink::append_to(&output_path)?
        } else {
            CsvOutputSink::create(&output_path)?
        };
        log::debug!(
            "reading listings from {} and log {}",
            items_dir.display(),
            config.migration_log_path().display()
        );
        let source = DirectorySource::new(items_dir);
        let loader = CsvLogLoader::new(config.migration_log_path());

        let summary = if config.cache_enabled() {
            let cache = open_cache(global, &config)?;
            run_pipeline(&config, &source, &cache, &sink, &loader)?
        } else {
            run_pipeline(&config, &source, &NoCache, &sink, &loader)?
        };

        self.report(global, &summary, &output_path)?;

        if summary.failed_principals.is_empty() {
            Ok(())
        } else {
            Err(CliError::SemanticFailure(format!(
                "{} principal(s) failed: {}",
                summary.failed_principals.len(),
                summary.failed_principals.join(", ")
            )))
        }
    }

    /// Command-line flags as the highest configuration layer.
    fn overrides(&self) -> Config {
        Config {
            migration_log: self.migration_log.clone(),
            output: self.output.clone(),
            items_dir: self.items_dir.clone(),
            concurrency: self.concurrency,
            root_destination_path: self.root_path.clone(),
            max_copy_number: self.max_copy_number,
            redact_principals: self.redact_principals.then_some(true),
            cache: self.no_cache.then(|| migmap::config::CacheConfig {
                enabled: Some(false),
                busy_timeout_ms: None,
            }),
            ..Config::default()
        }
    }

    fn report(
        &self,
        global: &GlobalOptions,
        summary: &Summary,
        output_path: &std::path::Path,
    ) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(summary)?);
            }
            OutputFormat::Human => {
                print!("{summary}");
                if self.show_unmatched {
                    for row in &summary.unmatched.rows {
                        println!(
                            "  row {}: {} {} -> {}",
                            row.row, row.destination_type, row.full_path, row.destination_location
                        );
                    }
                }
                if !global.quiet {
                    println!("Dataset written to {}", shorten_path(output_path));
                }
            }
        }
        Ok(())
    }
}

fn run_pipeline(
    config: &Config,
    source: &DirectorySource,
    cache: &dyn CacheStore,
    sink: &CsvOutputSink,
    loader: &CsvLogLoader,
) -> Result<Summary, CliError> {
    let pipeline = Pipeline::new(source, cache, sink, config.pipeline_options());
    Ok(pipeline.run(loader, config.index_options())?)
}
