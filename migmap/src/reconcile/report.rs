//! Diagnostics produced after matching.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::reconcile::entry::LogEntry;

/// One log row that no live item claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedRow {
    /// Log row position.
    pub row: usize,
    /// Principal of the row.
    pub principal: String,
    /// Source full path.
    pub full_path: String,
    /// Destination type.
    pub destination_type: String,
    /// Destination location.
    pub destination_location: String,
}

impl From<&LogEntry> for UnmatchedRow {
    fn from(entry: &LogEntry) -> Self {
        Self {
            row: entry.row(),
            principal: entry.principal().to_string(),
            full_path: entry.full_path().to_string(),
            destination_type: entry.destination_type().to_string(),
            destination_location: entry.destination_location().to_string(),
        }
    }
}

/// Unclaimed log entries and their breakdowns.
///
/// Every map is keyed in sorted order so that two reports over the same
/// data serialize identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnmatchedReport {
    /// Unmatched rows ordered by log position.
    pub rows: Vec<UnmatchedRow>,
    /// Counts by source extension.
    pub by_source_extension: BTreeMap<String, usize>,
    /// Counts by destination extension.
    pub by_destination_extension: BTreeMap<String, usize>,
    /// Counts by destination type.
    pub by_destination_type: BTreeMap<String, usize>,
    /// Character histogram over unmatched full paths, separators excluded.
    pub by_character: BTreeMap<char, usize>,
    /// Counts by trailing copy number, for paths that carry one.
    pub by_copy_number: BTreeMap<u32, usize>,
    /// Unclaimed rows left out because they look like the migration root.
    pub suppressed_root_folders: usize,
}

impl UnmatchedReport {
    /// Number of unmatched rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether every row was matched or suppressed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Character inventories of log paths and live item names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CharacterStats {
    /// Distinct characters in log full paths.
    pub log_chars: usize,
    /// Distinct characters in live item names.
    pub live_chars: usize,
    /// Characters seen in live names but never in log paths.
    pub live_only: BTreeSet<char>,
}
