//! Configuration merging and precedence handling.
//!
//! This module implements hierarchical merging of configuration sources,
//! with special handling for the accumulated `known_errors` field.

use crate::config::loader::ConfigSource;
use crate::config::schema::{CacheConfig, Config};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use migmap::config::{Config, ConfigMerger};
///
/// let low = Config { concurrency: Some(4), ..Default::default() };
/// let high = Config { concurrency: Some(16), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.concurrency, Some(16));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into final config.
    ///
    /// Sources should be provided in order from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();

        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }

        result
    }

    /// Merge source config into target (source overwrites target).
    ///
    /// # Merging Rules
    ///
    /// - Simple fields: source overwrites if Some
    /// - Known errors: accumulated, without duplicates
    /// - Cache config: field-by-field merge
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.migration_log.is_some() {
            target.migration_log.clone_from(&source.migration_log);
        }

        if source.output.is_some() {
            target.output.clone_from(&source.output);
        }

        if source.items_dir.is_some() {
            target.items_dir.clone_from(&source.items_dir);
        }

        if source.concurrency.is_some() {
            target.concurrency = source.concurrency;
        }

        if source.root_destination_path.is_some() {
            target
                .root_destination_path
                .clone_from(&source.root_destination_path);
        }

        if source.max_copy_number.is_some() {
            target.max_copy_number = source.max_copy_number;
        }

        if source.redact_principals.is_some() {
            target.redact_principals = source.redact_principals;
        }

        if let Some(ref source_known) = source.known_errors {
            let known = target.known_errors.get_or_insert_with(Vec::new);
            for message in source_known {
                if !known.contains(message) {
                    known.push(message.clone());
                }
            }
        }

        if let Some(ref source_cache) = source.cache {
            target.cache = Some(match &target.cache {
                Some(target_cache) => Self::merge_cache(target_cache, source_cache),
                None => source_cache.clone(),
            });
        }
    }

    fn merge_cache(target: &CacheConfig, source: &CacheConfig) -> CacheConfig {
        CacheConfig {
            enabled: source.enabled.or(target.enabled),
            busy_timeout_ms: source.busy_timeout_ms.or(target.busy_timeout_ms),
        }
    }
}
