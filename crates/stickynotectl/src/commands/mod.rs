//! Subcommand implementations.

pub mod list;
pub mod write;

use anyhow::{Context, Result};
use serde::Serialize;
use stickynote::config::Config;
use stickynote::ui::NoteColor;
use stickynote::{Note, NoteService, Storage};

/// A note as printed by `-o json`.
#[derive(Serialize)]
pub struct NoteInfo {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub color: NoteColor,
    pub hex: String,
}

impl From<Note> for NoteInfo {
    fn from(note: Note) -> Self {
        let color = NoteColor::for_id(note.id);
        Self {
            id: note.id,
            title: note.title,
            description: note.description,
            color,
            hex: color.hex(),
        }
    }
}

/// Open the board's storage, creating the data directory on first use.
pub fn open(config: &Config) -> Result<Storage> {
    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!(
            "failed to create data directory {}",
            config.data_dir.display()
        )
    })?;
    let storage = Storage::open(config).context("failed to open note storage")?;
    tracing::debug!(path = %storage.db_path().display(), "Opened note storage");
    Ok(storage)
}

/// Flush pending mutations and close storage.
pub async fn close(service: NoteService, storage: Storage) -> Result<()> {
    service.shutdown().await;
    storage.close().await.context("failed to close note storage")?;
    Ok(())
}
