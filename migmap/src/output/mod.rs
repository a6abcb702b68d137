//! Output sinks for matched items.
//!
//! The pipeline hands each principal's matched items to a sink in one call
//! as soon as that principal finishes, so output grows while the run is
//! still in progress. Sinks are shared between workers and serialize their
//! own writes.

mod csv_sink;
mod memory;

use serde::Serialize;

use crate::error::Result;
use crate::item::MatchedItem;

pub use csv_sink::CsvOutputSink;
pub use memory::MemorySink;

/// Placeholder for metadata the provider did not report.
pub const NOT_AVAILABLE: &str = "N/A";

/// Receives matched items, one batch per principal.
pub trait OutputSink: Send + Sync {
    /// Appends a batch of matched items.
    ///
    /// # Errors
    ///
    /// Returns an error if the items cannot be written.
    fn append_matched_items(&self, items: &[MatchedItem]) -> Result<()>;
}

/// One row of the output dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetRow<'a> {
    #[serde(rename = "googleFileId")]
    file_id: &'a str,
    #[serde(rename = "googleFileName")]
    file_name: &'a str,
    #[serde(rename = "googlePath")]
    path: &'a str,
    #[serde(rename = "googleUrl")]
    url: &'a str,
    #[serde(rename = "googleOwnerEmail")]
    owner_email: &'a str,
    #[serde(rename = "googleLastAccessedTime")]
    last_accessed_time: &'a str,
    #[serde(rename = "googleLastModifyingUser")]
    last_modifying_user: &'a str,
    #[serde(rename = "microsoftUrl")]
    destination_url: &'a str,
    #[serde(rename = "microsoftPath")]
    destination_path: &'a str,
    #[serde(rename = "microsoftFileType")]
    destination_type: &'a str,
}

impl<'a> From<&'a MatchedItem> for DatasetRow<'a> {
    fn from(matched: &'a MatchedItem) -> Self {
        let item = &matched.item;
        Self {
            file_id: &item.id,
            file_name: &item.name,
            path: &matched.path,
            url: item.url.as_deref().unwrap_or_default(),
            owner_email: item.owner.as_deref().unwrap_or_default(),
            last_accessed_time: item.last_viewed.as_deref().unwrap_or(NOT_AVAILABLE),
            last_modifying_user: item.last_modifying_user.as_deref().unwrap_or(NOT_AVAILABLE),
            destination_url: &matched.destination_location,
            destination_path: &matched.destination_path,
            destination_type: &matched.destination_type,
        }
    }
}

/// Column names of the output dataset, in order.
pub const DATASET_COLUMNS: &[&str] = &[
    "googleFileId",
    "googleFileName",
    "googlePath",
    "googleUrl",
    "googleOwnerEmail",
    "googleLastAccessedTime",
    "googleLastModifyingUser",
    "microsoftUrl",
    "microsoftPath",
    "microsoftFileType",
];
