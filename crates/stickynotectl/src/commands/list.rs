//! List and show command implementations.

use anyhow::{anyhow, Context, Result};
use futures::StreamExt;
use serde::Serialize;
use stickynote::config::Config;
use stickynote::ui::render_note;

use super::NoteInfo;
use crate::OutputFormat;

#[derive(Serialize)]
struct NotesOutput {
    notes: Vec<NoteInfo>,
    total: usize,
}

pub async fn list(config: &Config, format: OutputFormat) -> Result<()> {
    let storage = super::open(config)?;

    let notes = match storage.repository().all_notes().next().await {
        Some(notes) => notes.context("failed to load notes")?,
        None => Vec::new(),
    };
    storage.close().await.context("failed to close note storage")?;

    let output = NotesOutput {
        total: notes.len(),
        notes: notes.into_iter().map(NoteInfo::from).collect(),
    };

    match format {
        OutputFormat::Text => {
            if output.notes.is_empty() {
                println!("No notes found.");
            } else {
                println!("{:>6}  {:<8} {:<30} DESCRIPTION", "ID", "COLOR", "TITLE");
                println!("{}", "-".repeat(72));
                for note in &output.notes {
                    println!(
                        "{:>6}  {:<8} {:<30} {}",
                        note.id,
                        note.color.name(),
                        first_line(&note.title),
                        first_line(&note.description)
                    );
                }
                println!();
                println!("Total: {} note(s)", output.total);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

pub async fn show(config: &Config, id: i64, format: OutputFormat) -> Result<()> {
    let storage = super::open(config)?;
    let note = storage
        .repository()
        .get_by_id(id)
        .await
        .context("failed to load note")?;
    storage.close().await.context("failed to close note storage")?;

    let note = note.ok_or_else(|| anyhow!("no note #{id}"))?;
    match format {
        OutputFormat::Text => print!("{}", render_note(&note)),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&NoteInfo::from(note))?);
        }
    }

    Ok(())
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}
