//! Live item sources.
//!
//! A source enumerates one principal's drive items, following pagination
//! until the listing is exhausted. Listing failures reported by the provider
//! surface as [`Error::Source`](crate::Error::Source) so that the pipeline
//! can tell expected failures from unexpected ones.

mod directory;
mod record;

use crate::error::Result;
use crate::item::LiveItem;

pub use directory::{DirectorySource, PROGRESS_PAGE_INTERVAL};
pub use record::{DriveFileRecord, EmailAddress};

/// Enumerates a principal's live drive items.
pub trait LiveItemSource: Send + Sync {
    /// Lists every item visible to `principal`.
    ///
    /// `label` identifies the principal in log lines and may differ from
    /// the principal itself when identifiers are redacted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Source`](crate::Error::Source) if the provider
    /// reports a failure, or an I/O or decoding error.
    fn list_items(&self, principal: &str, label: &str) -> Result<Vec<LiveItem>>;
}
