//! stickynotectl: Command-line interface for stickynote boards.
//!
//! Provides one-shot commands for listing, adding, editing, and removing
//! notes in a board's data directory without opening the interactive board.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Command-line interface for stickynote boards.
#[derive(Parser)]
#[command(name = "stickynotectl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Data directory holding the notes database
    #[arg(short, long, env = "STICKYNOTE_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List all notes, newest first
    List,
    /// Show one note
    Show {
        /// Note id
        id: i64,
    },
    /// Add a new note
    Add {
        /// Note title
        title: String,
        /// Note description
        #[arg(default_value = "")]
        description: String,
    },
    /// Replace the title and description of a note
    Edit {
        /// Note id
        id: i64,
        /// New title
        title: String,
        /// New description
        #[arg(default_value = "")]
        description: String,
    },
    /// Remove a note
    Rm {
        /// Note id
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let config = stickynote::config::Config {
        data_dir: cli.data_dir,
        ..Default::default()
    };

    match cli.command {
        Commands::List => commands::list::list(&config, cli.output).await?,
        Commands::Show { id } => commands::list::show(&config, id, cli.output).await?,
        Commands::Add { title, description } => {
            commands::write::add(&config, &title, &description, cli.output).await?;
        }
        Commands::Edit {
            id,
            title,
            description,
        } => {
            commands::write::edit(&config, id, &title, &description, cli.output).await?;
        }
        Commands::Rm { id } => commands::write::remove(&config, id, cli.output).await?,
    }

    Ok(())
}
