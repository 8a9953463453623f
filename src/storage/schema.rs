//! Schema initialization and connection pragmas.
//!
//! The schema version is mirrored to `PRAGMA user_version`; a database
//! written by a newer binary is refused rather than silently reused.

use rusqlite::Connection;
use std::time::Duration;
use thiserror::Error;

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS notes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT ''
);
"#;

/// Error type for schema setup.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("database schema version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Apply pragmas for the writer connection.
pub fn apply_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}

/// Apply pragmas for pooled reader connections.
pub fn apply_reader_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "query_only", "ON")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}

/// Create the notes table if needed and stamp the schema version.
pub fn initialize_schema(conn: &Connection) -> Result<(), SchemaError> {
    let found = user_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(SchemaError::UnsupportedVersion {
            found,
            supported: SCHEMA_VERSION,
        });
    }

    if found < SCHEMA_VERSION {
        conn.execute_batch(SCHEMA_V1)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        tracing::debug!(from = found, to = SCHEMA_VERSION, "Schema initialized");
    }

    Ok(())
}

fn user_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}
