//! Mutation orchestration for notes.
//!
//! [`NoteService`] validates user intents, trims input, and forwards them to
//! the [`NoteRepository`] on background tasks. Callers may drop the returned
//! handle (fire-and-forget) or await it for the [`Outcome`].

use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;

use crate::model::Note;
use crate::observe::LiveNotes;
use crate::repository::{NoteRepository, StoreError};

/// Result of a mutation that reached a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A new note was stored with this id.
    Created(i64),
    /// The note with this id was replaced.
    Updated(i64),
    /// The note with this id was removed.
    Deleted(i64),
    /// Nothing was written.
    Skipped(Skip),
}

/// Why a mutation wrote nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// Title and description were both blank.
    EmptyNote,
    /// The id was zero or negative.
    InvalidId,
    /// No note with that id exists.
    NotFound,
}

/// Handle to a launched mutation.
pub type MutationHandle = JoinHandle<Result<Outcome, StoreError>>;

/// Note mutations plus the shared live note list.
#[derive(Clone)]
pub struct NoteService {
    repo: NoteRepository,
    notes: LiveNotes,
    tasks: TaskTracker,
}

impl NoteService {
    pub fn new(repo: NoteRepository) -> Self {
        Self {
            notes: LiveNotes::new(repo.clone()),
            repo,
            tasks: TaskTracker::new(),
        }
    }

    /// The live, newest-first note list.
    pub fn notes(&self) -> &LiveNotes {
        &self.notes
    }

    /// Store a new note. Blank title and description together are skipped.
    pub fn create(&self, title: &str, description: &str) -> MutationHandle {
        let repo = self.repo.clone();
        let note = Note::new(title.trim(), description.trim());
        self.launch(async move { create_note(&repo, note).await })
    }

    /// Replace the note `id` with the given fields.
    ///
    /// Skips non-positive ids, blank notes, and ids with no stored note.
    pub fn edit(&self, id: i64, title: &str, description: &str) -> MutationHandle {
        let repo = self.repo.clone();
        let note = Note::with_id(id, title.trim(), description.trim());
        self.launch(async move { edit_note(&repo, note).await })
    }

    /// Delete `note`. A note that is already gone is skipped.
    pub fn remove(&self, note: Note) -> MutationHandle {
        let repo = self.repo.clone();
        self.launch(async move { remove_note(&repo, note).await })
    }

    /// Wait for every launched mutation to finish.
    ///
    /// Call before closing storage so queued writes are not lost.
    pub async fn shutdown(&self) {
        self.tasks.close();
        self.tasks.wait().await;
    }

    fn launch<F>(&self, work: F) -> MutationHandle
    where
        F: std::future::Future<Output = Result<Outcome, StoreError>> + Send + 'static,
    {
        self.tasks.spawn(async move {
            let result = work.await;
            match &result {
                Ok(Outcome::Skipped(reason)) => tracing::debug!(?reason, "Mutation skipped"),
                Ok(outcome) => tracing::debug!(?outcome, "Mutation applied"),
                Err(e) => tracing::error!(error = %e, "Mutation failed"),
            }
            result
        })
    }
}

fn is_blank(note: &Note) -> bool {
    note.title.is_empty() && note.description.is_empty()
}

#[tracing::instrument(skip(repo, note))]
async fn create_note(repo: &NoteRepository, note: Note) -> Result<Outcome, StoreError> {
    if is_blank(&note) {
        return Ok(Outcome::Skipped(Skip::EmptyNote));
    }
    let id = repo.upsert(note).await?;
    Ok(Outcome::Created(id))
}

#[tracing::instrument(skip(repo, note), fields(id = note.id))]
async fn edit_note(repo: &NoteRepository, note: Note) -> Result<Outcome, StoreError> {
    if note.id <= 0 {
        return Ok(Outcome::Skipped(Skip::InvalidId));
    }
    if is_blank(&note) {
        return Ok(Outcome::Skipped(Skip::EmptyNote));
    }
    let id = note.id;
    if repo.update(note).await? {
        Ok(Outcome::Updated(id))
    } else {
        Ok(Outcome::Skipped(Skip::NotFound))
    }
}

#[tracing::instrument(skip(repo, note), fields(id = note.id))]
async fn remove_note(repo: &NoteRepository, note: Note) -> Result<Outcome, StoreError> {
    if repo.delete(&note).await? {
        Ok(Outcome::Deleted(note.id))
    } else {
        Ok(Outcome::Skipped(Skip::NotFound))
    }
}
