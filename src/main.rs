//! Stickynote: an interactive, live-updating note board.
//!
//! # Usage
//!
//! ```bash
//! stickynote --data-dir ./data --log-level info
//! ```
//!
//! Environment variables can also be used:
//! - `STICKYNOTE_DATA_DIR`: Data directory for SQLite
//! - `STICKYNOTE_NO_COLOR`: Render cards without ANSI colors
//! - `STICKYNOTE_LOG_JSON`: Emit logs as JSON lines
//! - `RUST_LOG`: Log level (trace, debug, info, warn, error)

use std::fs;
use stickynote::app::run_app;
use stickynote::config::Config;
use stickynote::observability::tracing::init_tracing;
use tokio::io::BufReader;
use tokio::sync::watch;

/// Print startup banner with version and configuration.
fn print_banner(config: &Config) {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        r#"
  Stickynote v{}

  Configuration:
    Database:   {}
    Log Level:  {}

  Type 'help' for commands, 'quit' or Ctrl+D to leave.
"#,
        version,
        config.db_path().display(),
        config.log_level
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse configuration from CLI arguments and environment
    let config = Config::parse_args();

    // Initialize tracing/logging
    init_tracing(&config.log_level, config.log_json);

    // Ensure data directory exists
    fs::create_dir_all(&config.data_dir)?;

    print_banner(&config);

    // Create shutdown signal channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Spawn signal handler task
    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm =
                signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

            tokio::select! {
                _ = ctrl_c => {
                    tracing::info!("Received SIGINT (Ctrl+C), initiating shutdown...");
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating shutdown...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            ctrl_c.await.expect("failed to listen for ctrl+c");
            tracing::info!("Received Ctrl+C, initiating shutdown...");
        }

        let _ = shutdown_tx.send(true);
    });

    let input = BufReader::new(tokio::io::stdin());
    run_app(&config, input, tokio::io::stdout(), shutdown_rx).await?;

    tracing::info!("Stickynote shutdown complete");
    Ok(())
}
