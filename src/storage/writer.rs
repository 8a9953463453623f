//! Dedicated writer thread.
//!
//! All mutations go through one SQLite connection owned by a single thread.
//! Callers talk to it over a bounded channel and await a oneshot reply, so
//! writes never block an async task and are applied in channel order.
//! Every statement runs in autocommit mode; after a write that changed a row
//! the writer announces it on the change bus.

use rusqlite::{params, Connection};
use std::path::Path;
use std::thread::JoinHandle;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use super::schema::{apply_pragmas, initialize_schema, SchemaError};
use crate::model::Note;
use crate::observe::notify::{ChangeBus, ChangeKind};

/// Error type for writer operations.
#[derive(Debug, Error)]
pub enum WriterError {
    #[error("writer channel closed")]
    ChannelClosed,

    #[error("database error: {0}")]
    Database(String),

    #[error("failed to open database: {0}")]
    Open(#[from] SchemaError),

    #[error("failed to spawn writer thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("writer thread panicked")]
    ThreadPanic,
}

impl From<rusqlite::Error> for WriterError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Commands accepted by the writer thread.
#[derive(Debug)]
enum WriteCommand {
    Upsert {
        note: Note,
        reply: oneshot::Sender<Result<i64, WriterError>>,
    },
    Update {
        note: Note,
        reply: oneshot::Sender<Result<bool, WriterError>>,
    },
    Delete {
        id: i64,
        reply: oneshot::Sender<Result<bool, WriterError>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

/// Cloneable handle for submitting writes.
#[derive(Clone, Debug)]
pub struct WriterHandle {
    tx: mpsc::Sender<WriteCommand>,
}

impl WriterHandle {
    /// Insert a note, or replace the whole row when `note.id` is positive.
    ///
    /// Returns the id of the written row.
    pub async fn upsert(&self, note: Note) -> Result<i64, WriterError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(WriteCommand::Upsert { note, reply })
            .await
            .map_err(|_| WriterError::ChannelClosed)?;
        rx.await.map_err(|_| WriterError::ChannelClosed)?
    }

    /// Overwrite title and description of the existing row `note.id`.
    ///
    /// Returns whether a row matched; a missing row is left missing.
    pub async fn update(&self, note: Note) -> Result<bool, WriterError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(WriteCommand::Update { note, reply })
            .await
            .map_err(|_| WriterError::ChannelClosed)?;
        rx.await.map_err(|_| WriterError::ChannelClosed)?
    }

    /// Delete the row with `id`.
    ///
    /// Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> Result<bool, WriterError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(WriteCommand::Delete { id, reply })
            .await
            .map_err(|_| WriterError::ChannelClosed)?;
        rx.await.map_err(|_| WriterError::ChannelClosed)?
    }

    /// Ask the writer thread to stop after draining queued writes.
    pub async fn shutdown(&self) -> Result<(), WriterError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(WriteCommand::Shutdown { reply })
            .await
            .map_err(|_| WriterError::ChannelClosed)?;
        rx.await.map_err(|_| WriterError::ChannelClosed)
    }
}

/// The writer thread and its handle.
pub struct Writer {
    handle: WriterHandle,
    thread: JoinHandle<()>,
}

impl Writer {
    /// Open the database, apply the schema, and spawn the writer thread.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the SQLite database file (created if missing)
    /// * `bus` - Change bus notified after each committed change
    /// * `channel_size` - Capacity of the write queue
    pub fn spawn<P: AsRef<Path>>(
        db_path: P,
        bus: ChangeBus,
        channel_size: usize,
    ) -> Result<Self, WriterError> {
        let conn = Connection::open(db_path.as_ref())?;
        apply_pragmas(&conn)?;
        initialize_schema(&conn)?;

        let (tx, rx) = mpsc::channel(channel_size.max(1));
        let thread = std::thread::Builder::new()
            .name("stickynote-writer".into())
            .spawn(move || run_writer(conn, rx, bus))?;

        tracing::debug!(path = %db_path.as_ref().display(), "Writer thread started");

        Ok(Self {
            handle: WriterHandle { tx },
            thread,
        })
    }

    /// Get a handle for submitting writes.
    pub fn handle(&self) -> WriterHandle {
        self.handle.clone()
    }

    /// Wait for the writer thread to exit.
    ///
    /// Call after [`WriterHandle::shutdown`], otherwise this blocks until
    /// every handle has been dropped.
    pub fn join(self) -> Result<(), WriterError> {
        drop(self.handle);
        self.thread.join().map_err(|_| WriterError::ThreadPanic)
    }
}

fn run_writer(conn: Connection, mut rx: mpsc::Receiver<WriteCommand>, bus: ChangeBus) {
    while let Some(command) = rx.blocking_recv() {
        match command {
            WriteCommand::Upsert { note, reply } => {
                let result = upsert_note(&conn, &note);
                match &result {
                    Ok(id) => {
                        tracing::debug!(id, "Note written");
                        bus.notify(ChangeKind::Upserted, *id);
                    }
                    Err(e) => tracing::error!(error = %e, id = note.id, "Note write failed"),
                }
                let _ = reply.send(result);
            }
            WriteCommand::Update { note, reply } => {
                let result = update_note(&conn, &note);
                match &result {
                    Ok(true) => {
                        tracing::debug!(id = note.id, "Note updated");
                        bus.notify(ChangeKind::Upserted, note.id);
                    }
                    Ok(false) => tracing::debug!(id = note.id, "Update matched no note"),
                    Err(e) => tracing::error!(error = %e, id = note.id, "Note update failed"),
                }
                let _ = reply.send(result);
            }
            WriteCommand::Delete { id, reply } => {
                let result = delete_note(&conn, id);
                match &result {
                    Ok(true) => {
                        tracing::debug!(id, "Note deleted");
                        bus.notify(ChangeKind::Deleted, id);
                    }
                    Ok(false) => tracing::debug!(id, "Delete matched no note"),
                    Err(e) => tracing::error!(error = %e, id, "Note delete failed"),
                }
                let _ = reply.send(result);
            }
            WriteCommand::Shutdown { reply } => {
                let _ = reply.send(());
                break;
            }
        }
    }

    tracing::debug!("Writer thread exiting");
}

fn upsert_note(conn: &Connection, note: &Note) -> Result<i64, WriterError> {
    if note.is_persisted() {
        conn.execute(
            "INSERT OR REPLACE INTO notes (id, title, description) VALUES (?1, ?2, ?3)",
            params![note.id, note.title, note.description],
        )?;
        Ok(note.id)
    } else {
        conn.execute(
            "INSERT INTO notes (title, description) VALUES (?1, ?2)",
            params![note.title, note.description],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

fn update_note(conn: &Connection, note: &Note) -> Result<bool, WriterError> {
    let changed = conn.execute(
        "UPDATE notes SET title = ?1, description = ?2 WHERE id = ?3",
        params![note.title, note.description, note.id],
    )?;
    Ok(changed > 0)
}

fn delete_note(conn: &Connection, id: i64) -> Result<bool, WriterError> {
    let changed = conn.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
    Ok(changed > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn count_rows(path: &Path) -> i64 {
        let conn = Connection::open(path).unwrap();
        conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let writer = Writer::spawn(&db_path, ChangeBus::new(16), 8).unwrap();
        let handle = writer.handle();

        let first = handle.upsert(Note::new("Milk", "")).await.unwrap();
        let second = handle.upsert(Note::new("Eggs", "")).await.unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);

        handle.shutdown().await.unwrap();
        writer.join().unwrap();
        assert_eq!(count_rows(&db_path), 2);
    }

    #[tokio::test]
    async fn test_upsert_with_id_replaces_row() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let writer = Writer::spawn(&db_path, ChangeBus::new(16), 8).unwrap();
        let handle = writer.handle();

        let id = handle.upsert(Note::new("Milk", "Buy 2 liters")).await.unwrap();
        let replaced = handle
            .upsert(Note::with_id(id, "Milk", "Buy 3 liters"))
            .await
            .unwrap();
        assert_eq!(replaced, id);

        handle.shutdown().await.unwrap();
        writer.join().unwrap();

        let conn = Connection::open(&db_path).unwrap();
        let description: String = conn
            .query_row("SELECT description FROM notes WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(description, "Buy 3 liters");
        assert_eq!(count_rows(&db_path), 1);
    }

    #[tokio::test]
    async fn test_delete_notifies_only_when_row_removed() {
        let temp_dir = TempDir::new().unwrap();
        let bus = ChangeBus::new(16);
        let mut changes = bus.subscribe();
        let writer = Writer::spawn(temp_dir.path().join("test.db"), bus, 8).unwrap();
        let handle = writer.handle();

        let id = handle.upsert(Note::new("Milk", "")).await.unwrap();
        assert!(!handle.delete(id + 100).await.unwrap());
        assert!(handle.delete(id).await.unwrap());

        let first = changes.recv().await.unwrap();
        assert_eq!(first.kind, ChangeKind::Upserted);
        let second = changes.recv().await.unwrap();
        assert_eq!(second.kind, ChangeKind::Deleted);
        assert_eq!(second.id, id);
        assert!(changes.try_recv().is_err());

        handle.shutdown().await.unwrap();
        writer.join().unwrap();
    }

    #[tokio::test]
    async fn test_update_never_creates_rows() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let bus = ChangeBus::new(16);
        let mut changes = bus.subscribe();
        let writer = Writer::spawn(&db_path, bus, 8).unwrap();
        let handle = writer.handle();

        let id = handle.upsert(Note::new("Milk", "Buy 2 liters")).await.unwrap();
        assert!(handle.delete(id).await.unwrap());
        assert!(!handle.update(Note::with_id(id, "Milk", "Buy 3 liters")).await.unwrap());

        let other = handle.upsert(Note::new("Eggs", "")).await.unwrap();
        assert!(handle.update(Note::with_id(other, "Eggs", "a dozen")).await.unwrap());

        let kinds: Vec<_> = std::iter::from_fn(|| changes.try_recv().ok())
            .map(|notice| (notice.kind, notice.id))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (ChangeKind::Upserted, id),
                (ChangeKind::Deleted, id),
                (ChangeKind::Upserted, other),
                (ChangeKind::Upserted, other),
            ]
        );

        handle.shutdown().await.unwrap();
        writer.join().unwrap();
        assert_eq!(count_rows(&db_path), 1);
    }

    #[tokio::test]
    async fn test_writes_after_shutdown_fail() {
        let temp_dir = TempDir::new().unwrap();
        let writer = Writer::spawn(temp_dir.path().join("test.db"), ChangeBus::new(16), 8).unwrap();
        let handle = writer.handle();

        handle.shutdown().await.unwrap();
        writer.join().unwrap();

        let err = handle.upsert(Note::new("late", "")).await.unwrap_err();
        assert!(matches!(err, WriterError::ChannelClosed));
    }
}
