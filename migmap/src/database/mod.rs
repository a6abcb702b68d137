//! `SQLite` storage for cached live item listings.
//!
//! Listings are keyed by principal and query fingerprint. The layer manages
//! connections, schema versioning, and the handful of operations the cache
//! needs.
//!
//! # Examples
//!
//! ```no_run
//! use migmap::database::{Database, DatabaseConfig};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/migmap/cache.db")).unwrap();
//! db.put_cache_entry("a@x.com", "3f2a", "", 0).unwrap();
//!
//! for entry in Database::list_cache_entries(db.connection()).unwrap() {
//!     println!("{} {} {}", entry.fingerprint, entry.principal, entry.item_count);
//! }
//! ```

mod config;
mod connection;
pub mod migrations;
mod operations;
mod schema;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE,
};
pub use connection::Database;
pub use operations::CacheEntryInfo;

pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
