//! Matching live items against the migration log.
//!
//! The migration log lists every item the migration tool copied, keyed by
//! the item's source path. The live drive knows each item's identifier and
//! metadata but not what happened to it. This module joins the two.
//!
//! # Key Concepts
//!
//! ## Keys
//!
//! A [`ReconciliationKey`] combines principal, destination type and a
//! normalized full path. Normalization trims whitespace and repairs a fixed
//! table of encoding corruptions found in migration logs.
//!
//! ## Claims
//!
//! Each [`LogEntry`] carries a usage counter. Matching a live path claims the
//! first unclaimed entry among the path and its copy-number variants
//! (`report.pdf`, `report (1).pdf`, ...). Claims are atomic, so an entry is
//! claimed at most once no matter how many workers race for it.
//!
//! ## Root folders
//!
//! A folder row whose destination ends with the configured root destination
//! path describes the migration root. Such rows are never claimed and never
//! reported as unmatched.

mod copy_number;
mod entry;
mod index;
mod key;
mod report;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use copy_number::{parse_copy_number, with_copy_number};
pub use entry::{destination_path, LogEntry, RawLogRow, RECOGNIZED_DESTINATION_TYPES};
pub use index::{Claim, Collision, IndexOptions, ReconciliationIndex, DEFAULT_MAX_COPY_NUMBER};
pub use key::{normalize_full_path, ReconciliationKey, SUBSTITUTIONS};
pub use report::{CharacterStats, UnmatchedReport, UnmatchedRow};
