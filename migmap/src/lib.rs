#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # migmap
//!
//! A library for reconciling live drive listings against the log of a
//! file-storage migration.
//!
//! Every live item of every principal is resolved into its full
//! hierarchical paths and matched against the migration log rows for that
//! principal. Matched items are annotated with their destination and
//! written out; rows that no live item claimed are reported as gaps.
//!
//! ## Core Types
//!
//! - [`LiveItem`] and [`MatchedItem`]: Live listing entries and their
//!   annotated form
//! - [`PathResolver`]: Multi-parent hierarchy to full path strings
//! - [`ReconciliationIndex`]: Migration log rows keyed for matching
//! - [`Pipeline`] and [`Summary`]: Bounded-concurrency fetch, match and emit
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use migmap::reconcile::{IndexOptions, LogEntry};
//! use migmap::{ItemKind, LiveItem, PathResolver, ReconciliationIndex};
//!
//! let entry = LogEntry::new(
//!     1,
//!     "a@x.com".into(),
//!     "/Docs/f.txt".into(),
//!     "https://t.sharepoint.com/Docs/f.txt".into(),
//!     "file".into(),
//!     "txt".into(),
//!     "txt".into(),
//! );
//! let index = ReconciliationIndex::build([entry], IndexOptions::default());
//!
//! let items = vec![
//!     LiveItem::new("d", "Docs", ItemKind::Folder, Vec::<String>::new()),
//!     LiveItem::new("f", "f.txt", ItemKind::File, ["d"]),
//! ];
//! let paths = PathResolver::new().resolve(&items).unwrap();
//! assert_eq!(paths.get("f"), ["/Docs/f.txt"]);
//!
//! let claim = index.match_item("a@x.com", "file", "/Docs/f.txt", "f.txt").unwrap();
//! assert_eq!(claim.entry.destination_path(), "/Docs/f.txt");
//! ```

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod item;
pub mod logging;
pub mod migration_log;
pub mod output;
pub mod path;
pub mod pipeline;
pub mod reconcile;
pub mod source;

// Re-export key types at crate root for convenience
pub use cache::{CacheKey, CacheStore, NoCache, QueryShape, SqliteCacheStore};
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, Result};
pub use item::{ItemKind, LiveItem, MatchedItem};
pub use logging::{init_logger, LogLevel, Logger};
pub use migration_log::{CsvLogLoader, MigrationLogLoader};
pub use output::{CsvOutputSink, OutputSink};
pub use path::{PathResolver, ResolvedPaths};
pub use pipeline::{Pipeline, PipelineOptions, Summary};
pub use reconcile::{IndexOptions, ReconciliationIndex, ReconciliationKey};
pub use source::{DirectorySource, LiveItemSource};
