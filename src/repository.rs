//! Note access operations.
//!
//! A live list of all notes, a single fetch by id, an upsert with
//! replace-on-conflict, an in-place update of an existing row, and a delete.
//! Writes go to the writer thread; reads run on the blocking pool against
//! pooled read-only connections.

use futures::stream::{self, Stream, StreamExt};
use std::pin::Pin;
use thiserror::Error;
use tokio_stream::wrappers::BroadcastStream;

use crate::model::Note;
use crate::observe::notify::ChangeBus;
use crate::storage::reader::{ReaderError, ReaderPool};
use crate::storage::writer::{WriterError, WriterHandle};

/// Error type for note access operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Writer(#[from] WriterError),

    #[error(transparent)]
    Reader(#[from] ReaderError),

    #[error("blocking read task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Stream of full note snapshots, newest first.
pub type NoteStream = Pin<Box<dyn Stream<Item = Result<Vec<Note>, StoreError>> + Send + 'static>>;

/// Access layer over the notes table.
#[derive(Clone)]
pub struct NoteRepository {
    writer: WriterHandle,
    readers: ReaderPool,
    bus: ChangeBus,
}

impl NoteRepository {
    pub(crate) fn new(writer: WriterHandle, readers: ReaderPool, bus: ChangeBus) -> Self {
        Self {
            writer,
            readers,
            bus,
        }
    }

    /// Every note, ordered by id descending, re-emitted after each change.
    ///
    /// The first item is the current table; afterwards one item follows
    /// every change notice. The stream never ends while a repository or
    /// storage handle is alive.
    pub fn all_notes(&self) -> NoteStream {
        // Subscribe before the first read so no change can slip between them.
        let changes = BroadcastStream::new(self.bus.subscribe()).map(|notice| {
            if let Err(e) = notice {
                tracing::debug!(error = %e, "Change feed lagged, re-reading notes");
            }
        });
        let readers = self.readers.clone();

        Box::pin(
            stream::once(async {})
                .chain(changes)
                .then(move |()| list_blocking(readers.clone())),
        )
    }

    /// Fetch one note by id without subscribing to later changes.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Note>, StoreError> {
        let readers = self.readers.clone();
        let note = tokio::task::spawn_blocking(move || readers.get_note(id)).await??;
        Ok(note)
    }

    /// Insert `note`, or replace the whole row when its id already exists.
    ///
    /// A note with a non-positive id always gets a fresh id. Returns the id
    /// of the written row.
    pub async fn upsert(&self, note: Note) -> Result<i64, StoreError> {
        Ok(self.writer.upsert(note).await?)
    }

    /// Overwrite the existing row `note.id` in one statement.
    ///
    /// Returns whether the row existed; a missing row is never created.
    pub async fn update(&self, note: Note) -> Result<bool, StoreError> {
        Ok(self.writer.update(note).await?)
    }

    /// Delete the row with `note.id`.
    ///
    /// Returns whether a row was removed; a missing row is not an error.
    pub async fn delete(&self, note: &Note) -> Result<bool, StoreError> {
        Ok(self.writer.delete(note.id).await?)
    }
}

async fn list_blocking(readers: ReaderPool) -> Result<Vec<Note>, StoreError> {
    let notes = tokio::task::spawn_blocking(move || readers.list_notes()).await??;
    Ok(notes)
}
