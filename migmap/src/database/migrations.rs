//! Cache schema initialization and version checks.

use rusqlite::{Connection, OptionalExtension};

use crate::error::{Error, Result};

use super::schema::{
    CREATE_CACHE_TABLE, CREATE_FINGERPRINT_INDEX, CREATE_METADATA_TABLE, CURRENT_SCHEMA_VERSION,
    INSERT_SCHEMA_VERSION, SELECT_SCHEMA_VERSION,
};

/// Creates all tables and indices and records the schema version.
///
/// # Errors
///
/// Returns an error if any SQL statement fails.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use migmap::database::migrations::{get_schema_version, initialize_schema};
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// assert_eq!(get_schema_version(&conn).unwrap(), 1);
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;
    conn.execute(CREATE_CACHE_TABLE, [])?;
    conn.execute(CREATE_FINGERPRINT_INDEX, [])?;
    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION.to_string()])?;
    Ok(())
}

/// Reads the schema version, `0` for an uninitialized database.
///
/// # Errors
///
/// Returns an error if the query fails or the stored version is not a number.
pub fn get_schema_version(conn: &Connection) -> Result<u32> {
    let has_metadata: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'metadata')",
        [],
        |row| row.get(0),
    )?;
    if !has_metadata {
        return Ok(0);
    }

    let value: Option<String> = conn
        .query_row(SELECT_SCHEMA_VERSION, [], |row| row.get(0))
        .optional()?;
    match value {
        None => Ok(0),
        Some(value) => value.parse().map_err(|_| Error::Validation {
            field: "schema_version".into(),
            message: format!("stored schema version '{value}' is not a number"),
        }),
    }
}

/// Initializes a fresh database or verifies the version of an existing one.
///
/// A read-only connection is never initialized.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSchemaVersion`] if the stored version differs
/// from [`CURRENT_SCHEMA_VERSION`], or a database error.
pub fn check_schema_compatibility(conn: &Connection, read_only: bool) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 && !read_only {
        initialize_schema(conn)?;
        return Ok(());
    }
    if version != CURRENT_SCHEMA_VERSION {
        return Err(Error::UnsupportedSchemaVersion {
            expected: CURRENT_SCHEMA_VERSION,
            found: version,
        });
    }
    Ok(())
}
