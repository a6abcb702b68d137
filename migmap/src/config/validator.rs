//! Configuration validation.
//!
//! Checks that every configured value is usable before a run starts.

use crate::config::schema::{CacheConfig, Config};
use crate::error::{Error, Result};

/// Upper bound on the number of principals processed at once.
pub const MAX_CONCURRENCY: usize = 1024;

/// Validates configuration values.
///
/// # Examples
///
/// ```
/// use migmap::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::defaults()).unwrap();
///
/// let bad = Config { concurrency: Some(0), ..Default::default() };
/// assert!(ConfigValidator::validate(&bad).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure found.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(concurrency) = config.concurrency {
            if !(1..=MAX_CONCURRENCY).contains(&concurrency) {
                return Err(Error::Validation {
                    field: "concurrency".into(),
                    message: format!("Must be between 1 and {MAX_CONCURRENCY}, got {concurrency}"),
                });
            }
        }

        if config.max_copy_number == Some(0) {
            return Err(Error::Validation {
                field: "max_copy_number".into(),
                message: "Must be at least 1".into(),
            });
        }

        if let Some(ref root) = config.root_destination_path {
            Self::validate_root_path(root)?;
        }

        if let Some(ref known) = config.known_errors {
            Self::validate_known_errors(known)?;
        }

        for (field, path) in [
            ("migration_log", &config.migration_log),
            ("output", &config.output),
            ("items_dir", &config.items_dir),
        ] {
            if path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
                return Err(Error::Validation {
                    field: field.into(),
                    message: "Cannot be empty".into(),
                });
            }
        }

        if let Some(ref cache) = config.cache {
            Self::validate_cache(cache)?;
        }

        Ok(())
    }

    fn validate_root_path(root: &str) -> Result<()> {
        if !root.starts_with('/') {
            return Err(Error::Validation {
                field: "root_destination_path".into(),
                message: format!("Must start with '/', got '{root}'"),
            });
        }
        Ok(())
    }

    fn validate_known_errors(known: &[String]) -> Result<()> {
        if known.iter().any(|message| message.trim().is_empty()) {
            return Err(Error::Validation {
                field: "known_errors".into(),
                message: "Cannot contain empty messages".into(),
            });
        }
        Ok(())
    }

    fn validate_cache(cache: &CacheConfig) -> Result<()> {
        if cache.busy_timeout_ms == Some(0) {
            return Err(Error::Validation {
                field: "cache.busy_timeout_ms".into(),
                message: "Timeout must be greater than 0".into(),
            });
        }
        Ok(())
    }
}
