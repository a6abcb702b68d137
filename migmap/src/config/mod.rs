//! Configuration system for migmap.
//!
//! This module provides hierarchical configuration with support for:
//! - YAML configuration files (user config and project files)
//! - Environment variable overrides
//! - Programmatic configuration via builder pattern
//! - Validation of every setting before a run
//!
//! # Configuration Precedence
//!
//! Configuration is merged from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`MIGMAP_*`)
//! 3. Private project config (`migmap.local.yaml`)
//! 4. Project config (`migmap.yaml`)
//! 5. User config (`~/.migmap/config.yaml`)
//! 6. Built-in defaults
//!
//! `known_errors` is the exception: every layer adds to the list instead of
//! replacing it.
//!
//! # Examples
//!
//! ```no_run
//! use migmap::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new()
//!     .with_working_dir("/path/to/project")
//!     .build()
//!     .unwrap();
//!
//! println!("Reading {}", config.migration_log_path().display());
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{
    ConfigLayer, ConfigLoader, ConfigSource, LOCAL_CONFIG, PROJECT_CONFIG, USER_CONFIG,
};
pub use merger::ConfigMerger;
pub use schema::{
    CacheConfig, Config, DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_MIGRATION_LOG, DEFAULT_OUTPUT,
};
pub use validator::{ConfigValidator, MAX_CONCURRENCY};
