//! Add, edit, and remove command implementations.

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use stickynote::config::Config;
use stickynote::service::MutationHandle;
use stickynote::{NoteService, Outcome, Skip};

use crate::OutputFormat;

#[derive(Serialize)]
struct MutationOutput {
    action: &'static str,
    id: i64,
}

pub async fn add(config: &Config, title: &str, description: &str, format: OutputFormat) -> Result<()> {
    let storage = super::open(config)?;
    let service = NoteService::new(storage.repository());

    let result = settle(service.create(title, description)).await;
    super::close(service, storage).await?;

    print_outcome(result?, format)
}

pub async fn edit(
    config: &Config,
    id: i64,
    title: &str,
    description: &str,
    format: OutputFormat,
) -> Result<()> {
    let storage = super::open(config)?;
    let service = NoteService::new(storage.repository());

    let result = settle(service.edit(id, title, description)).await;
    super::close(service, storage).await?;

    print_outcome(result?, format)
}

pub async fn remove(config: &Config, id: i64, format: OutputFormat) -> Result<()> {
    let storage = super::open(config)?;
    let service = NoteService::new(storage.repository());

    let result = match storage.repository().get_by_id(id).await {
        Ok(Some(note)) => settle(service.remove(note)).await,
        Ok(None) => Ok(Outcome::Skipped(Skip::NotFound)),
        Err(e) => Err(anyhow!(e).context("failed to load note")),
    };
    super::close(service, storage).await?;

    print_outcome(result?, format)
}

async fn settle(handle: MutationHandle) -> Result<Outcome> {
    handle
        .await
        .context("mutation task failed")?
        .context("failed to save note")
}

fn print_outcome(outcome: Outcome, format: OutputFormat) -> Result<()> {
    let output = match outcome {
        Outcome::Created(id) => MutationOutput { action: "created", id },
        Outcome::Updated(id) => MutationOutput { action: "updated", id },
        Outcome::Deleted(id) => MutationOutput { action: "deleted", id },
        Outcome::Skipped(Skip::EmptyNote) => bail!("nothing to save: title and description are blank"),
        Outcome::Skipped(Skip::InvalidId) => bail!("invalid note id"),
        Outcome::Skipped(Skip::NotFound) => bail!("note not found"),
    };

    match format {
        OutputFormat::Text => println!("Note #{} {}", output.id, output.action),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
    }

    Ok(())
}
