//! Cache store backed by the `SQLite` cache database.

use std::sync::{Mutex, PoisonError};

use crate::cache::jsonl::{decode_items, encode_items};
use crate::cache::{CacheKey, CacheStore};
use crate::database::{CacheEntryInfo, Database, DatabaseConfig};
use crate::error::Result;
use crate::item::LiveItem;

/// Persistent cache store.
///
/// `SQLite` connections are not `Sync`, so the connection sits behind a
/// mutex and workers take turns.
#[derive(Debug)]
pub struct SqliteCacheStore {
    db: Mutex<Database>,
}

impl SqliteCacheStore {
    /// Opens (and if needed creates) the cache database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        Ok(Self::from_database(Database::open(config)?))
    }

    /// Wraps an already open database.
    #[must_use]
    pub fn from_database(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    /// Lists stored listings without their payloads.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_entries(&self) -> Result<Vec<CacheEntryInfo>> {
        let db = self.db.lock().unwrap_or_else(PoisonError::into_inner);
        Database::list_cache_entries(db.connection())
    }

    /// Removes every listing, or only those of `fingerprint` when given.
    /// Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn clear(&self, fingerprint: Option<&str>) -> Result<usize> {
        let mut db = self.db.lock().unwrap_or_else(PoisonError::into_inner);
        match fingerprint {
            Some(fingerprint) => db.clear_fingerprint(fingerprint),
            None => db.clear_cache(),
        }
    }
}

impl CacheStore for SqliteCacheStore {
    fn get(&self, key: &CacheKey) -> Result<Option<Vec<LiveItem>>> {
        let payload = {
            let db = self.db.lock().unwrap_or_else(PoisonError::into_inner);
            Database::get_cache_payload(db.connection(), &key.principal, &key.fingerprint)?
        };
        Ok(payload.map(|payload| decode_items(&payload)))
    }

    fn put(&self, key: &CacheKey, items: &[LiveItem]) -> Result<()> {
        let payload = encode_items(items)?;
        let mut db = self.db.lock().unwrap_or_else(PoisonError::into_inner);
        db.put_cache_entry(&key.principal, &key.fingerprint, &payload, items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKind;
    use tempfile::tempdir;

    fn items() -> Vec<LiveItem> {
        let mut file = LiveItem::new("f", "f.txt", ItemKind::File, ["d"]);
        file.url = Some("https://drive/f".into());
        vec![
            LiveItem::new("d", "Docs", ItemKind::Folder, Vec::<String>::new()),
            file,
        ]
    }

    #[test]
    fn test_put_then_get() {
        let store = SqliteCacheStore::from_database(Database::open_in_memory().unwrap());
        let key = CacheKey::new("a@x.com", "fp");

        assert!(store.get(&key).unwrap().is_none());
        store.put(&key, &items()).unwrap();
        assert_eq!(store.get(&key).unwrap(), Some(items()));
    }

    #[test]
    fn test_empty_listing_is_a_hit() {
        let store = SqliteCacheStore::from_database(Database::open_in_memory().unwrap());
        let key = CacheKey::new("a@x.com", "fp");
        store.put(&key, &[]).unwrap();
        assert_eq!(store.get(&key).unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.db");
        let key = CacheKey::new("a@x.com", "fp");

        SqliteCacheStore::open(DatabaseConfig::new(&path))
            .unwrap()
            .put(&key, &items())
            .unwrap();

        let reopened = SqliteCacheStore::open(DatabaseConfig::new(&path)).unwrap();
        assert_eq!(reopened.get(&key).unwrap().map(|i| i.len()), Some(2));
        assert_eq!(reopened.list_entries().unwrap()[0].item_count, 2);
    }

    #[test]
    fn test_clear_by_fingerprint() {
        let store = SqliteCacheStore::from_database(Database::open_in_memory().unwrap());
        store.put(&CacheKey::new("a@x.com", "old"), &items()).unwrap();
        store.put(&CacheKey::new("a@x.com", "new"), &items()).unwrap();

        assert_eq!(store.clear(Some("old")).unwrap(), 1);
        assert_eq!(store.list_entries().unwrap().len(), 1);
        assert_eq!(store.clear(None).unwrap(), 1);
    }
}
