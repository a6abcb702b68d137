//! Migration log rows and indexed log entries.

use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Prefix of destination locations that are kept verbatim.
const FORMS_PREFIX: &str = "https://forms.office.com/";

/// Destination types the index knows how to match.
pub const RECOGNIZED_DESTINATION_TYPES: &[&str] = &["file", "folder", "MicrosoftForm"];

/// One row of the migration log as it appears on disk.
///
/// Every field defaults to empty so that rows with missing columns reach
/// [`RawLogRow::validate`] instead of failing the whole parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLogRow {
    /// Principal (email address) that owned the source item.
    #[serde(rename = "SourcePath", default)]
    pub source_path: String,

    /// Source path of the item, slash-delimited from the drive root.
    #[serde(rename = "FullPath", default)]
    pub full_path: String,

    /// Destination URL or path.
    #[serde(rename = "DestinationLocation", default)]
    pub destination_location: String,

    /// `file`, `folder` or `MicrosoftForm`.
    #[serde(rename = "DestinationType", default)]
    pub destination_type: String,

    /// Extension at the destination.
    #[serde(rename = "DestinationExtension", default)]
    pub destination_extension: String,

    /// Extension at the source.
    #[serde(rename = "SourceExtension", default)]
    pub source_extension: String,
}

impl RawLogRow {
    /// Checks required fields and builds a [`LogEntry`] for log row `row`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] naming the first empty required field.
    pub fn validate(self, row: usize) -> Result<LogEntry> {
        let required = [
            ("SourcePath", &self.source_path),
            ("FullPath", &self.full_path),
            ("DestinationType", &self.destination_type),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::MissingField { row, field });
            }
        }

        Ok(LogEntry::new(
            row,
            self.source_path.trim().to_string(),
            self.full_path,
            self.destination_location.trim().to_string(),
            self.destination_type.trim().to_string(),
            self.source_extension.trim().to_string(),
            self.destination_extension.trim().to_string(),
        ))
    }
}

/// Derives the destination path from a destination location.
///
/// The scheme and host of an `https://` URL are removed. Locations on the
/// forms host, and anything that is not an `https://` URL, are returned
/// unchanged.
///
/// # Examples
///
/// ```
/// use migmap::reconcile::destination_path;
///
/// assert_eq!(
///     destination_path("https://tenant.sharepoint.com/sites/a/Docs/f.txt"),
///     "/sites/a/Docs/f.txt"
/// );
/// assert_eq!(
///     destination_path("https://forms.office.com/r/abc"),
///     "https://forms.office.com/r/abc"
/// );
/// assert_eq!(destination_path("/Docs"), "/Docs");
/// ```
#[must_use]
pub fn destination_path(location: &str) -> String {
    if location.starts_with(FORMS_PREFIX) {
        return location.to_string();
    }
    match location.strip_prefix("https://") {
        Some(rest) => rest.find('/').map_or_else(String::new, |i| rest[i..].to_string()),
        None => location.to_string(),
    }
}

/// One indexed migration log row with its usage counter.
///
/// Everything except the counter is immutable after construction. The
/// counter is shared between worker threads and only drops again when a
/// claim is released because its item never reached the output.
#[derive(Debug)]
pub struct LogEntry {
    row: usize,
    principal: String,
    full_path: String,
    destination_location: String,
    destination_path: String,
    destination_type: String,
    source_extension: String,
    destination_extension: String,
    usage: AtomicU32,
}

impl LogEntry {
    /// Creates an unclaimed entry.
    #[must_use]
    pub fn new(
        row: usize,
        principal: String,
        full_path: String,
        destination_location: String,
        destination_type: String,
        source_extension: String,
        destination_extension: String,
    ) -> Self {
        let destination_path = destination_path(&destination_location);
        Self {
            row,
            principal,
            full_path,
            destination_location,
            destination_path,
            destination_type,
            source_extension,
            destination_extension,
            usage: AtomicU32::new(0),
        }
    }

    /// Position of the row in the migration log, starting at 1.
    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Principal that owned the source item.
    #[must_use]
    pub fn principal(&self) -> &str {
        &self.principal
    }

    /// Source full path as written in the log.
    #[must_use]
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// Destination URL or path as written in the log.
    #[must_use]
    pub fn destination_location(&self) -> &str {
        &self.destination_location
    }

    /// Destination location with the host removed.
    #[must_use]
    pub fn destination_path(&self) -> &str {
        &self.destination_path
    }

    /// Destination type.
    #[must_use]
    pub fn destination_type(&self) -> &str {
        &self.destination_type
    }

    /// Source extension.
    #[must_use]
    pub fn source_extension(&self) -> &str {
        &self.source_extension
    }

    /// Destination extension.
    #[must_use]
    pub fn destination_extension(&self) -> &str {
        &self.destination_extension
    }

    /// Whether the destination type is one the index can match.
    #[must_use]
    pub fn has_recognized_type(&self) -> bool {
        RECOGNIZED_DESTINATION_TYPES.contains(&self.destination_type.as_str())
    }

    /// Number of live items that claimed this entry.
    #[must_use]
    pub fn usage(&self) -> u32 {
        self.usage.load(Ordering::Acquire)
    }

    /// Claims the entry if nobody has yet.
    ///
    /// At most one caller observes `true` for a given entry, however many
    /// threads race for it.
    pub fn try_claim(&self) -> bool {
        self.usage
            .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Gives back a claim taken with [`try_claim`](Self::try_claim).
    ///
    /// Returns `false` if the entry was not claimed exactly once.
    pub fn release(&self) -> bool {
        self.usage
            .compare_exchange(1, 0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Whether two entries point at the same destination.
    #[must_use]
    pub fn same_destination(&self, other: &Self) -> bool {
        self.destination_location == other.destination_location
            && self.destination_extension == other.destination_extension
    }
}
