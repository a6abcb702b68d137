//! SQL definitions for the item cache.

/// Current schema version for the cache database.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Key-value metadata, including the schema version.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// One cached item listing per principal and query fingerprint.
///
/// `payload` holds the items as JSON Lines, one item per line.
pub const CREATE_CACHE_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS cache_entries (
        principal TEXT NOT NULL,
        fingerprint TEXT NOT NULL,
        payload TEXT NOT NULL,
        item_count INTEGER NOT NULL,
        created_at INTEGER NOT NULL,
        PRIMARY KEY (principal, fingerprint)
    )";

/// Speeds up clearing a single fingerprint.
pub const CREATE_FINGERPRINT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_cache_entries_fingerprint ON cache_entries(fingerprint)";

/// Reads the schema version.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// Writes the schema version.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// Stores or replaces one listing.
pub const UPSERT_CACHE_ENTRY: &str = r"
    INSERT OR REPLACE INTO cache_entries
    (principal, fingerprint, payload, item_count, created_at)
    VALUES (?, ?, ?, ?, ?)
";

/// Loads one listing.
pub const SELECT_CACHE_PAYLOAD: &str = r"
    SELECT payload FROM cache_entries
    WHERE principal = ? AND fingerprint = ?
";

/// Lists entries without their payloads.
pub const LIST_CACHE_ENTRIES: &str = r"
    SELECT principal, fingerprint, item_count, created_at
    FROM cache_entries
    ORDER BY fingerprint, principal
";

/// Deletes every entry.
pub const DELETE_ALL_ENTRIES: &str = "DELETE FROM cache_entries";

/// Deletes entries of one fingerprint.
pub const DELETE_FINGERPRINT_ENTRIES: &str = "DELETE FROM cache_entries WHERE fingerprint = ?";
