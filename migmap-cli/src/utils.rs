//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including configuration loading, cache database management and output
//! formatting.

use crate::error::CliError;
use migmap::database::DATABASE_FILE;
use migmap::{Config, ConfigBuilder, SqliteCacheStore};
use std::path::{Path, PathBuf};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Command-line overrides (highest priority)
/// 2. Environment variables
/// 3. Configuration files
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions, overrides: Config) -> Result<Config, CliError> {
    let mut builder = ConfigBuilder::new().with_config(overrides);
    if let Some(ref data_dir) = global.data_dir {
        builder = builder.with_data_dir(data_dir);
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

/// Resolve the data directory path.
///
/// Priority: `--data-dir` (or `MIGMAP_DATA_DIR`) > `~/.migmap`
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match global.data_dir {
        Some(ref data_dir) => Ok(data_dir.clone()),
        None => migmap::database::resolve_data_dir().map_err(|e| CliError::Config(e.to_string())),
    }
}

/// Resolve the cache database path.
pub fn resolve_database_path(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    Ok(resolve_data_dir(global)?.join(DATABASE_FILE))
}

/// Open the listing cache, creating the database if needed.
pub fn open_cache(global: &GlobalOptions, config: &Config) -> Result<SqliteCacheStore, CliError> {
    let data_dir = resolve_data_dir(global)?;
    SqliteCacheStore::open(config.database_config(&data_dir)).map_err(CliError::from)
}

/// Format a timestamp for display.
pub fn format_timestamp(ts: std::time::SystemTime) -> String {
    use chrono::{DateTime, Utc};
    let dt: DateTime<Utc> = ts.into();
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Shorten a path for display.
///
/// If the path is within the home directory, show it as ~/...
/// Otherwise, show the full path.
pub fn shorten_path(path: &Path) -> String {
    if let Some(home) = home::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}
