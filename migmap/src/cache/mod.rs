//! Caching of live item listings.
//!
//! A listing is cached per principal and [`QueryShape`] fingerprint. A cache
//! hit skips the live source entirely; a miss fetches from the source and
//! then stores the result. Stores are shared between pipeline workers, so
//! every implementation is `Send + Sync`.
//!
//! # Examples
//!
//! ```
//! use migmap::cache::{CacheKey, CacheStore, MemoryCacheStore, QueryShape};
//! use migmap::{ItemKind, LiveItem};
//!
//! let store = MemoryCacheStore::new();
//! let key = CacheKey::new("a@x.com", QueryShape::default().fingerprint());
//!
//! assert!(store.get(&key).unwrap().is_none());
//! store.put(&key, &[LiveItem::new("f1", "f.txt", ItemKind::File, ["d1"])]).unwrap();
//! assert_eq!(store.get(&key).unwrap().unwrap().len(), 1);
//! ```

mod fingerprint;
mod jsonl;
mod memory;
mod sqlite;

use std::fmt;

use crate::error::Result;
use crate::item::LiveItem;

pub use fingerprint::QueryShape;
pub use jsonl::{decode_items, encode_items};
pub use memory::MemoryCacheStore;
pub use sqlite::SqliteCacheStore;

/// Identifies one cached listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    /// Principal the listing belongs to.
    pub principal: String,
    /// Fingerprint of the query shape.
    pub fingerprint: String,
}

impl CacheKey {
    /// Creates a key.
    #[must_use]
    pub fn new(principal: impl Into<String>, fingerprint: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            fingerprint: fingerprint.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.fingerprint, self.principal)
    }
}

/// Storage for item listings.
///
/// Callers treat `put` failures as non-fatal: the pipeline logs them and
/// carries on with the freshly fetched items.
pub trait CacheStore: Send + Sync {
    /// Returns the cached listing, or `None` on a miss.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &CacheKey) -> Result<Option<Vec<LiveItem>>>;

    /// Stores a listing, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn put(&self, key: &CacheKey, items: &[LiveItem]) -> Result<()>;
}

/// A store that never hits and discards every write.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl CacheStore for NoCache {
    fn get(&self, _key: &CacheKey) -> Result<Option<Vec<LiveItem>>> {
        Ok(None)
    }

    fn put(&self, _key: &CacheKey, _items: &[LiveItem]) -> Result<()> {
        Ok(())
    }
}
