//! Cache entry CRUD operations.

use std::time::{Duration, SystemTime};

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use crate::error::Result;

use super::connection::Database;
use super::schema::{
    DELETE_ALL_ENTRIES, DELETE_FINGERPRINT_ENTRIES, LIST_CACHE_ENTRIES, SELECT_CACHE_PAYLOAD,
    UPSERT_CACHE_ENTRY,
};

/// Converts a `SystemTime` to Unix epoch seconds for database storage.
///
/// # Errors
///
/// Returns an error if the time is before the Unix epoch.
#[allow(clippy::cast_possible_wrap)]
pub(super) fn systemtime_to_unix_secs(time: SystemTime) -> Result<i64> {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map_err(|e| crate::error::Error::Validation {
            field: "timestamp".into(),
            message: format!("Invalid timestamp: {e}"),
        })
        .map(|d| d.as_secs() as i64)
}

/// Converts Unix epoch seconds from the database to a `SystemTime`.
#[allow(clippy::cast_sign_loss)]
pub(super) fn unix_secs_to_systemtime(secs: i64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs.max(0) as u64)
}

/// Summary of one cached listing, without its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntryInfo {
    /// Principal the listing belongs to.
    pub principal: String,
    /// Query fingerprint the listing was fetched with.
    pub fingerprint: String,
    /// Number of items in the listing.
    pub item_count: usize,
    /// When the listing was stored.
    pub created_at: SystemTime,
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn row_to_entry_info(row: &rusqlite::Row<'_>) -> rusqlite::Result<CacheEntryInfo> {
    let item_count: i64 = row.get(2)?;
    Ok(CacheEntryInfo {
        principal: row.get(0)?,
        fingerprint: row.get(1)?,
        item_count: item_count.max(0) as usize,
        created_at: unix_secs_to_systemtime(row.get(3)?),
    })
}

impl Database {
    /// Stores a listing, replacing any previous one for the same key.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started, the write
    /// fails, or the transaction cannot be committed.
    ///
    /// # Examples
    ///
    /// ```
    /// use migmap::database::Database;
    ///
    /// let mut db = Database::open_in_memory().unwrap();
    /// db.put_cache_entry("a@x.com", "abc123", "{\"id\":\"1\",\"name\":\"f\"}\n", 1).unwrap();
    /// assert!(Database::get_cache_payload(db.connection(), "a@x.com", "abc123").unwrap().is_some());
    /// ```
    #[allow(clippy::cast_possible_wrap)]
    pub fn put_cache_entry(
        &mut self,
        principal: &str,
        fingerprint: &str,
        payload: &str,
        item_count: usize,
    ) -> Result<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            UPSERT_CACHE_ENTRY,
            params![
                principal,
                fingerprint,
                payload,
                item_count as i64,
                systemtime_to_unix_secs(SystemTime::now())?,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Loads the payload of a listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_cache_payload(
        conn: &Connection,
        principal: &str,
        fingerprint: &str,
    ) -> Result<Option<String>> {
        let payload = conn
            .query_row(SELECT_CACHE_PAYLOAD, params![principal, fingerprint], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(payload)
    }

    /// Lists all cached listings ordered by fingerprint and principal.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_cache_entries(conn: &Connection) -> Result<Vec<CacheEntryInfo>> {
        let mut stmt = conn.prepare(LIST_CACHE_ENTRIES)?;
        let entries = stmt
            .query_map([], row_to_entry_info)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(entries)
    }

    /// Deletes every cached listing and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn clear_cache(&mut self) -> Result<usize> {
        Ok(self.conn.execute(DELETE_ALL_ENTRIES, [])?)
    }

    /// Deletes the listings of one fingerprint and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn clear_fingerprint(&mut self, fingerprint: &str) -> Result<usize> {
        Ok(self.conn.execute(DELETE_FINGERPRINT_ENTRIES, [fingerprint])?)
    }
}
