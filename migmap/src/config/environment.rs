//! Environment variable handling for configuration overrides.
//!
//! This module provides support for `MIGMAP_*` environment variables that
//! override configuration file values.

use crate::config::schema::Config;
use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use migmap::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// Reads all `MIGMAP_*` environment variables and applies them with
    /// higher precedence than file-based configs. `MIGMAP_KNOWN_ERRORS` is
    /// a comma-separated list added to the existing known errors.
    ///
    /// # Errors
    ///
    /// Returns an error if any environment variable value is invalid
    /// (e.g., non-numeric concurrency, invalid boolean).
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Some(path) = Self::non_empty("MIGMAP_MIGRATION_LOG") {
            config.migration_log = Some(PathBuf::from(path));
        }

        if let Some(path) = Self::non_empty("MIGMAP_OUTPUT") {
            config.output = Some(PathBuf::from(path));
        }

        if let Some(path) = Self::non_empty("MIGMAP_ITEMS_DIR") {
            config.items_dir = Some(PathBuf::from(path));
        }

        if let Some(val) = Self::non_empty("MIGMAP_CONCURRENCY") {
            config.concurrency = Some(Self::parse_number("MIGMAP_CONCURRENCY", &val)?);
        }

        if let Some(path) = Self::non_empty("MIGMAP_ROOT_DESTINATION_PATH") {
            config.root_destination_path = Some(path);
        }

        if let Some(val) = Self::non_empty("MIGMAP_MAX_COPY_NUMBER") {
            config.max_copy_number = Some(Self::parse_number("MIGMAP_MAX_COPY_NUMBER", &val)?);
        }

        if let Some(val) = Self::non_empty("MIGMAP_KNOWN_ERRORS") {
            let messages = Self::parse_list(&val);
            match &mut config.known_errors {
                Some(existing) => existing.extend(messages),
                None => config.known_errors = Some(messages),
            }
        }

        if let Some(val) = Self::non_empty("MIGMAP_REDACT_PRINCIPALS") {
            config.redact_principals = Some(Self::parse_bool("MIGMAP_REDACT_PRINCIPALS", &val)?);
        }

        Self::apply_cache_overrides(config)?;

        Ok(())
    }

    fn apply_cache_overrides(config: &mut Config) -> Result<()> {
        let mut cache = config.cache.clone().unwrap_or_default();
        let mut modified = false;

        if let Some(val) = Self::non_empty("MIGMAP_CACHE_ENABLED") {
            cache.enabled = Some(Self::parse_bool("MIGMAP_CACHE_ENABLED", &val)?);
            modified = true;
        }

        if let Some(val) = Self::non_empty("MIGMAP_CACHE_BUSY_TIMEOUT_MS") {
            cache.busy_timeout_ms = Some(Self::parse_number("MIGMAP_CACHE_BUSY_TIMEOUT_MS", &val)?);
            modified = true;
        }

        if modified {
            config.cache = Some(cache);
        }

        Ok(())
    }

    fn non_empty(name: &str) -> Option<String> {
        env::var(name).ok().filter(|v| !v.trim().is_empty())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }

    fn parse_number<T: FromStr>(field: &str, s: &str) -> Result<T> {
        s.trim().parse().map_err(|_| Error::Validation {
            field: field.into(),
            message: format!("Must be a non-negative integer, got '{s}'"),
        })
    }

    /// Split a comma-separated list, dropping blank entries.
    fn parse_list(s: &str) -> Vec<String> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    }
}
