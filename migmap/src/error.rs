//! Error types for the migmap library.
//!
//! This module provides the error hierarchy for all operations in the
//! migmap library, using `thiserror` for ergonomic error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a migmap error.
///
/// # Examples
///
/// ```
/// use migmap::{Error, Result};
///
/// fn example_operation() -> Result<usize> {
///     Ok(25)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the migmap library.
#[derive(Debug, Error)]
pub enum Error {
    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A cache database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// A JSON (de)serialization error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A CSV read or write error occurred.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A migration log row is missing a required field.
    #[error("row {row} is missing required field '{field}'")]
    MissingField {
        /// The 1-based row position in the migration log.
        row: usize,
        /// The missing field.
        field: &'static str,
    },

    /// The parent graph of a principal's items contains a cycle.
    #[error("parent cycle detected at item '{item_id}'")]
    CycleDetected {
        /// The item that was reached while it was still being resolved.
        item_id: String,
    },

    /// The live item source reported one or more errors for a principal.
    #[error("source failure for {principal}: {}", messages.join("; "))]
    Source {
        /// The principal whose listing failed.
        principal: String,
        /// The error messages reported by the provider.
        messages: Vec<String>,
    },

    /// The migration log could not be loaded.
    #[error("failed to load migration log {}: {reason}", path.display())]
    LogLoad {
        /// Location of the migration log.
        path: PathBuf,
        /// The reason loading failed.
        reason: String,
    },

    /// An unsupported cache schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: u32,
        /// The schema version found in the database.
        found: u32,
    },
}

impl Error {
    /// Check if error indicates a cyclic parent graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use migmap::Error;
    ///
    /// let err = Error::CycleDetected { item_id: "a".into() };
    /// assert!(err.is_cycle());
    /// ```
    #[must_use]
    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::CycleDetected { .. })
    }

    /// Check if every message of a source failure is on the allow-list.
    ///
    /// Returns `false` for any error that is not a [`Error::Source`], and for
    /// source failures that carry no messages at all.
    ///
    /// # Examples
    ///
    /// ```
    /// use migmap::Error;
    ///
    /// let known = vec!["Drive disabled".to_string()];
    /// let err = Error::Source {
    ///     principal: "a@x.com".into(),
    ///     messages: vec!["Drive disabled".into()],
    /// };
    /// assert!(err.is_known_source_failure(&known));
    /// ```
    #[must_use]
    pub fn is_known_source_failure(&self, known: &[String]) -> bool {
        match self {
            Self::Source { messages, .. } => {
                !messages.is_empty() && messages.iter().all(|m| known.iter().any(|k| k == m))
            }
            _ => false,
        }
    }
}
