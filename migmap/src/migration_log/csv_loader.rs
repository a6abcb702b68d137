//! CSV migration log loader.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{Error, Result};
use crate::migration_log::{LoadedLog, MigrationLogLoader, PositionedRow};
use crate::reconcile::RawLogRow;

/// Columns read from the log. Any others are ignored.
pub const SELECTED_COLUMNS: &[&str] = &[
    "SourcePath",
    "FullPath",
    "DestinationLocation",
    "DestinationType",
    "DestinationExtension",
    "SourceExtension",
];

/// Columns the header must contain for the log to be usable at all.
pub const REQUIRED_COLUMNS: &[&str] = &["SourcePath", "FullPath", "DestinationType"];

/// Reads a migration log exported as CSV with a header row.
///
/// Fields are trimmed and blank lines ignored. A data row whose field count
/// differs from the header's is counted as invalid and skipped.
///
/// # Examples
///
/// ```no_run
/// use migmap::migration_log::{CsvLogLoader, MigrationLogLoader};
///
/// let log = CsvLogLoader::new("resources/migration_log_input.csv").load_rows().unwrap();
/// println!("{} rows, {} invalid", log.rows.len(), log.invalid_rows);
/// ```
#[derive(Debug, Clone)]
pub struct CsvLogLoader {
    path: PathBuf,
}

impl CsvLogLoader {
    /// Creates a loader for the log at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the log.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_error(&self, reason: impl Into<String>) -> Error {
        Error::LogLoad {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn selected_headers(headers: &StringRecord) -> StringRecord {
        headers
            .iter()
            .map(|h| {
                if SELECTED_COLUMNS.contains(&h) {
                    h
                } else {
                    ""
                }
            })
            .collect()
    }
}

impl MigrationLogLoader for CsvLogLoader {
    fn load_rows(&self) -> Result<LoadedLog> {
        let file = File::open(&self.path).map_err(|e| self.load_error(e.to_string()))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| self.load_error(e.to_string()))?
            .clone();
        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|c| !headers.iter().any(|h| h == **c))
        {
            return Err(self.load_error(format!("missing column '{missing}'")));
        }
        // Unselected columns get a blank name so that serde ignores them.
        let selected = Self::selected_headers(&headers);

        let mut log = LoadedLog::default();
        for (n, record) in reader.records().enumerate() {
            let position = n + 1;
            let record = record.map_err(|e| self.load_error(e.to_string()))?;
            if record.len() != headers.len() {
                log::debug!(
                    "row {position} has {} fields, expected {}",
                    record.len(),
                    headers.len()
                );
                log.invalid_rows += 1;
                continue;
            }
            let row: RawLogRow = record.deserialize(Some(&selected))?;
            log.rows.push(PositionedRow { position, row });
        }

        log::info!(
            "loaded {} migration log rows, {} invalid rows were skipped",
            log.rows.len(),
            log.invalid_rows
        );
        Ok(log)
    }
}
