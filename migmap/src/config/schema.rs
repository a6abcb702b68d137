//! Configuration schema definitions.
//!
//! This module defines the configuration structure for migmap: where the
//! migration log and live listings come from, where the dataset goes, and
//! the tunables of the matching pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::QueryShape;
use crate::database::{DatabaseConfig, DATABASE_FILE};
use crate::pipeline::{PipelineOptions, DEFAULT_CONCURRENCY, DRIVE_APPS_DISABLED};
use crate::reconcile::{IndexOptions, DEFAULT_MAX_COPY_NUMBER};

/// Default migration log location, relative to the working directory.
pub const DEFAULT_MIGRATION_LOG: &str = "resources/migration_log_input.csv";

/// Default dataset location, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "build-output/dataset.csv";

/// Default cache busy timeout in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Complete configuration structure.
///
/// Every field is optional so that partial files can be layered on top of
/// each other. [`ConfigBuilder`](crate::config::ConfigBuilder) starts from
/// [`Config::defaults`], so a built configuration has every defaulted field
/// set.
///
/// # Examples
///
/// ```
/// use migmap::config::Config;
///
/// let config = Config {
///     concurrency: Some(8),
///     root_destination_path: Some("/Docs".to_string()),
///     ..Default::default()
/// };
/// assert_eq!(config.concurrency, Some(8));
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Migration log CSV to reconcile against.
    pub migration_log: Option<PathBuf>,

    /// Dataset CSV the matched items are written to.
    pub output: Option<PathBuf>,

    /// Directory holding exported live listings, one set of files per
    /// principal.
    pub items_dir: Option<PathBuf>,

    /// Maximum number of principals processed at once.
    pub concurrency: Option<usize>,

    /// Destination path of the migration root folder.
    pub root_destination_path: Option<String>,

    /// Highest copy number tried when matching duplicate names.
    pub max_copy_number: Option<u32>,

    /// Provider messages that mark a principal's failure as expected.
    #[serde(default)]
    pub known_errors: Option<Vec<String>>,

    /// Listing cache settings.
    pub cache: Option<CacheConfig>,

    /// Log principals by position instead of by address.
    pub redact_principals: Option<bool>,
}

/// Listing cache settings.
///
/// # Examples
///
/// ```
/// use migmap::config::CacheConfig;
///
/// let cache = CacheConfig::default();
/// assert_eq!(cache.enabled, Some(true));
/// assert_eq!(cache.busy_timeout_ms, Some(5000));
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Whether listings are read from and written to the cache database.
    pub enabled: Option<bool>,

    /// How long to wait on a locked cache database (milliseconds).
    pub busy_timeout_ms: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: Some(true),
            busy_timeout_ms: Some(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }
}

impl Config {
    /// The built-in defaults, the lowest layer of every built configuration.
    ///
    /// `items_dir` and `root_destination_path` have no default.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            migration_log: Some(PathBuf::from(DEFAULT_MIGRATION_LOG)),
            output: Some(PathBuf::from(DEFAULT_OUTPUT)),
            items_dir: None,
            concurrency: Some(DEFAULT_CONCURRENCY),
            root_destination_path: None,
            max_copy_number: Some(DEFAULT_MAX_COPY_NUMBER),
            known_errors: Some(vec![DRIVE_APPS_DISABLED.to_string()]),
            cache: Some(CacheConfig::default()),
            redact_principals: Some(false),
        }
    }

    /// Migration log path, falling back to the default.
    #[must_use]
    pub fn migration_log_path(&self) -> PathBuf {
        self.migration_log
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MIGRATION_LOG))
    }

    /// Dataset path, falling back to the default.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
    }

    /// Whether the listing cache is in use.
    #[must_use]
    pub fn cache_enabled(&self) -> bool {
        self.cache
            .as_ref()
            .and_then(|c| c.enabled)
            .unwrap_or(true)
    }

    /// Options for building the reconciliation index.
    #[must_use]
    pub fn index_options(&self) -> IndexOptions {
        IndexOptions {
            max_copy_number: self.max_copy_number.unwrap_or(DEFAULT_MAX_COPY_NUMBER),
            root_destination_path: self.root_destination_path.clone(),
        }
    }

    /// Options for the fetch and match pipeline.
    #[must_use]
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            concurrency: self.concurrency.unwrap_or(DEFAULT_CONCURRENCY),
            known_errors: self
                .known_errors
                .clone()
                .unwrap_or_else(|| vec![DRIVE_APPS_DISABLED.to_string()]),
            redact_principals: self.redact_principals.unwrap_or(false),
            query_shape: QueryShape::default(),
        }
    }

    /// Cache database settings for a database inside `data_dir`.
    #[must_use]
    pub fn database_config(&self, data_dir: &Path) -> DatabaseConfig {
        let timeout = self
            .cache
            .as_ref()
            .and_then(|c| c.busy_timeout_ms)
            .unwrap_or(DEFAULT_BUSY_TIMEOUT_MS);
        DatabaseConfig::new(data_dir.join(DATABASE_FILE))
            .with_busy_timeout(Duration::from_millis(timeout))
    }
}
