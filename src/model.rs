//! The note record.

use serde::{Deserialize, Serialize};

/// A short text note.
///
/// `id` is assigned by storage on first insert. A note with `id == 0` has
/// not been persisted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub description: String,
}

impl Note {
    /// Build an unsaved note.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Build a note addressed to an existing row.
    pub fn with_id(id: i64, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Whether this note carries a storage-assigned id.
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }
}
