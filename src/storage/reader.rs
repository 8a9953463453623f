//! Read connection pool for note queries.
//!
//! Uses r2d2 with r2d2_sqlite for pooled read access.
//! SQLite WAL mode lets readers run while the writer commits.

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{OpenFlags, OptionalExtension, Row};
use std::path::Path;
use thiserror::Error;

use super::schema::apply_reader_pragmas;
use crate::model::Note;

/// Error type for reader pool operations.
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("Failed to create connection pool: {0}")]
    PoolCreation(#[from] r2d2::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Read connection pool for note queries.
///
/// Connections are opened read-only; the database must already have been
/// created by the writer.
#[derive(Clone)]
pub struct ReaderPool {
    pool: Pool<SqliteConnectionManager>,
}

impl ReaderPool {
    /// Create a new reader pool for the given database path.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the SQLite database file
    /// * `max_size` - Maximum number of connections in the pool
    pub fn new<P: AsRef<Path>>(db_path: P, max_size: u32) -> Result<Self, ReaderError> {
        let manager = SqliteConnectionManager::file(db_path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX);

        let pool = Pool::builder()
            .max_size(max_size.max(1))
            .connection_customizer(Box::new(ReaderConnectionCustomizer))
            .build(manager)?;

        Ok(Self { pool })
    }

    /// Get a connection from the pool.
    pub fn get(&self) -> Result<PooledConnection<SqliteConnectionManager>, ReaderError> {
        Ok(self.pool.get()?)
    }

    /// Get the current pool state for monitoring.
    pub fn state(&self) -> r2d2::State {
        self.pool.state()
    }

    /// List every note, newest (highest id) first.
    pub fn list_notes(&self) -> Result<Vec<Note>, ReaderError> {
        let conn = self.get()?;
        let mut stmt =
            conn.prepare_cached("SELECT id, title, description FROM notes ORDER BY id DESC")?;
        let notes = stmt
            .query_map([], note_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    /// Fetch a single note by id.
    pub fn get_note(&self, id: i64) -> Result<Option<Note>, ReaderError> {
        let conn = self.get()?;
        let note = conn
            .query_row(
                "SELECT id, title, description FROM notes WHERE id = ?1 LIMIT 1",
                [id],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
    })
}

/// Connection customizer that applies reader pragmas.
#[derive(Debug)]
struct ReaderConnectionCustomizer;

impl r2d2::CustomizeConnection<rusqlite::Connection, rusqlite::Error>
    for ReaderConnectionCustomizer
{
    fn on_acquire(&self, conn: &mut rusqlite::Connection) -> Result<(), rusqlite::Error> {
        apply_reader_pragmas(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::schema::{apply_pragmas, initialize_schema};
    use rusqlite::Connection;
    use tempfile::TempDir;

    fn seeded_db(temp_dir: &TempDir) -> std::path::PathBuf {
        let db_path = temp_dir.path().join("test.db");
        let conn = Connection::open(&db_path).unwrap();
        apply_pragmas(&conn).unwrap();
        initialize_schema(&conn).unwrap();
        for (title, description) in [("Milk", "Buy 2 liters"), ("Eggs", ""), ("Bread", "rye")] {
            conn.execute(
                "INSERT INTO notes (title, description) VALUES (?1, ?2)",
                [title, description],
            )
            .unwrap();
        }
        db_path
    }

    #[test]
    fn test_list_notes_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let pool = ReaderPool::new(seeded_db(&temp_dir), 2).unwrap();

        let notes = pool.list_notes().unwrap();
        let ids: Vec<i64> = notes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(notes[2], Note::with_id(1, "Milk", "Buy 2 liters"));
    }

    #[test]
    fn test_get_note_present_and_absent() {
        let temp_dir = TempDir::new().unwrap();
        let pool = ReaderPool::new(seeded_db(&temp_dir), 2).unwrap();

        assert_eq!(pool.get_note(2).unwrap(), Some(Note::with_id(2, "Eggs", "")));
        assert_eq!(pool.get_note(42).unwrap(), None);
    }

    #[test]
    fn test_pool_state_tracks_checked_out_connections() {
        let temp_dir = TempDir::new().unwrap();
        let pool = ReaderPool::new(seeded_db(&temp_dir), 2).unwrap();
        assert_eq!(pool.state().connections, 2);

        let held = pool.get().unwrap();
        assert_eq!(pool.state().idle_connections, 1);
        drop(held);
        assert_eq!(pool.state().idle_connections, 2);
    }

    #[test]
    fn test_reader_connections_reject_writes() {
        let temp_dir = TempDir::new().unwrap();
        let pool = ReaderPool::new(seeded_db(&temp_dir), 1).unwrap();

        let conn = pool.get().unwrap();
        let result = conn.execute("DELETE FROM notes", []);
        assert!(result.is_err());
    }
}
