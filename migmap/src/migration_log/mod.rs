//! Loading the migration log.
//!
//! Loaders only parse. Validation happens afterwards in
//! [`LoadedLog::into_entries`], which turns well-formed rows into
//! [`LogEntry`] values and quarantines the rest.

mod csv_loader;

use crate::error::Result;
use crate::reconcile::{LogEntry, RawLogRow};

pub use csv_loader::{CsvLogLoader, REQUIRED_COLUMNS, SELECTED_COLUMNS};

/// A parsed row and its 1-based position among the log's data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedRow {
    /// Row position, counting every data row including skipped ones.
    pub position: usize,
    /// The parsed row.
    pub row: RawLogRow,
}

/// The rows of one migration log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedLog {
    /// Parsed rows in file order.
    pub rows: Vec<PositionedRow>,
    /// Rows skipped because their column count did not match the header.
    pub invalid_rows: usize,
}

impl LoadedLog {
    /// Validates every row, returning the entries in log order and the
    /// number of quarantined rows.
    #[must_use]
    pub fn into_entries(self) -> (Vec<LogEntry>, usize) {
        let mut quarantined = 0;
        let entries = self
            .rows
            .into_iter()
            .filter_map(|PositionedRow { position, row }| match row.validate(position) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("quarantined log row: {e}");
                    quarantined += 1;
                    None
                }
            })
            .collect();
        (entries, quarantined)
    }
}

/// Produces migration log rows in file order.
pub trait MigrationLogLoader {
    /// Loads every row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LogLoad`](crate::Error::LogLoad) if the log cannot
    /// be read at all. Individual bad rows never fail the load.
    fn load_rows(&self) -> Result<LoadedLog>;
}
