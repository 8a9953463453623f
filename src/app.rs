//! Interactive board lifecycle.
//!
//! Opens storage, wires the note service, and then runs two loops until
//! `quit`, end of input, or the shutdown signal:
//! - a render task that redraws the board on every snapshot change
//! - a command loop that turns input lines into note intents
//!
//! Everything written to the terminal goes through one printer task.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::model::Note;
use crate::service::{MutationHandle, NoteService, Outcome, Skip};
use crate::storage::Storage;
use crate::ui::{parse_command, render_board, render_note, Command, HELP};

type Printer = mpsc::UnboundedSender<String>;

/// Run the board until quit, EOF on `input`, or `shutdown_rx` fires.
///
/// Pending writes are flushed and storage is closed before returning.
pub async fn run_app<R, W>(
    config: &Config,
    input: R,
    output: W,
    mut shutdown_rx: watch::Receiver<bool>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let storage = Storage::open(config).context("failed to open note storage")?;
    let service = NoteService::new(storage.repository());
    let color = !config.no_color;

    let (printer, printer_rx) = mpsc::unbounded_channel();
    let printer_task = tokio::spawn(run_printer(printer_rx, output));

    // Commands resolve ids against the live snapshot, so it must be loaded
    // before the first one is read.
    let mut observer = service.notes().subscribe();
    let initial = observer.loaded().await;
    let _ = printer.send(render_board(&initial, color));

    let render_cancel = CancellationToken::new();
    let render_task = {
        let printer = printer.clone();
        let cancelled = render_cancel.clone();
        tokio::spawn(async move {
            loop {
                let notes = tokio::select! {
                    biased;
                    () = cancelled.cancelled() => break,
                    notes = observer.changed() => notes,
                };
                if printer.send(render_board(&notes, color)).is_err() {
                    break;
                }
            }
        })
    };

    let mut lines = input.lines();
    loop {
        let line = tokio::select! {
            _ = shutdown_rx.changed() => {
                tracing::info!("Shutdown signal received, leaving board");
                break;
            }
            line = lines.next_line() => line.context("failed to read input")?,
        };
        let Some(line) = line else {
            tracing::debug!("End of input");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => handle_command(&service, command, &printer, color),
            Err(e) => {
                let _ = printer.send(format!("{e}\n"));
            }
        }
    }

    service.shutdown().await;
    render_cancel.cancel();
    let _ = render_task.await;
    storage.close().await.context("failed to close note storage")?;

    drop(printer);
    printer_task
        .await
        .context("printer task failed")?
        .context("failed to write output")?;
    Ok(())
}

fn handle_command(service: &NoteService, command: Command, printer: &Printer, color: bool) {
    match command {
        Command::Add { title, description } => {
            report(service.create(&title, &description), printer.clone());
        }
        Command::Edit {
            id,
            title,
            description,
        } => {
            report(service.edit(id, &title, &description), printer.clone());
        }
        Command::Remove { id } => match find_note(service, id) {
            Some(note) => report(service.remove(note), printer.clone()),
            None => {
                let _ = printer.send(format!("No note #{id}\n"));
            }
        },
        Command::Show { id } => {
            let text = match find_note(service, id) {
                Some(note) => render_note(&note),
                None => format!("No note #{id}\n"),
            };
            let _ = printer.send(text);
        }
        Command::List => {
            let _ = printer.send(render_board(&service.notes().current(), color));
        }
        Command::Help => {
            let _ = printer.send(HELP.to_string());
        }
        Command::Quit => {}
    }
}

/// Look a note up in the snapshot currently on screen.
fn find_note(service: &NoteService, id: i64) -> Option<Note> {
    service.notes().current().into_iter().find(|note| note.id == id)
}

/// Watch a launched mutation and print a line only when it wrote nothing
/// or failed; successful writes show up as a redraw.
fn report(handle: MutationHandle, printer: Printer) {
    tokio::spawn(async move {
        let message = match handle.await {
            Ok(Ok(Outcome::Skipped(Skip::EmptyNote))) => Some("Nothing to save".to_string()),
            Ok(Ok(Outcome::Skipped(Skip::InvalidId))) => Some("Invalid note id".to_string()),
            Ok(Ok(Outcome::Skipped(Skip::NotFound))) => Some("That note is gone".to_string()),
            Ok(Ok(_)) => None,
            Ok(Err(e)) => Some(format!("Could not save: {e}")),
            Err(e) => Some(format!("Could not save: {e}")),
        };
        if let Some(message) = message {
            let _ = printer.send(format!("{message}\n"));
        }
    });
}

async fn run_printer<W>(mut rx: mpsc::UnboundedReceiver<String>, mut output: W) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(text) = rx.recv().await {
        output.write_all(text.as_bytes()).await?;
        output.flush().await?;
    }
    output.shutdown().await
}
