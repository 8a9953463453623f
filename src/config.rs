//! Configuration parsing for the stickynote board.
//!
//! Supports:
//! - CLI arguments via clap
//! - Environment variable overrides
//! - Sensible defaults for quick start

use clap::Parser;
use std::path::PathBuf;

/// File name of the notes database inside the data directory.
pub const DB_FILE_NAME: &str = "notes.db";

/// Stickynote: short text notes with a live-updating board.
#[derive(Parser, Debug, Clone)]
#[command(name = "stickynote")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Data directory for the SQLite database
    #[arg(short, long, env = "STICKYNOTE_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text
    #[arg(long, env = "STICKYNOTE_LOG_JSON")]
    pub log_json: bool,

    /// Size of the write channel (backpressure control)
    #[arg(long, env = "STICKYNOTE_WRITE_CHANNEL_SIZE", default_value_t = 64)]
    pub write_channel_size: usize,

    /// Size of the reader connection pool
    #[arg(long, env = "STICKYNOTE_READER_POOL_SIZE", default_value_t = 4)]
    pub reader_pool_size: u32,

    /// Size of the change notification channel
    #[arg(long, env = "STICKYNOTE_NOTIFY_CHANNEL_SIZE", default_value_t = 256)]
    pub notify_channel_size: usize,

    /// Disable ANSI colors when rendering the board
    #[arg(long, env = "STICKYNOTE_NO_COLOR")]
    pub no_color: bool,
}

impl Config {
    /// Parse configuration from CLI arguments and environment.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Path of the notes database file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    /// Create a configuration for tests rooted at `data_dir`.
    pub fn test_config(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            log_level: "debug".into(),
            log_json: false,
            write_channel_size: 16,
            reader_pool_size: 2,
            notify_channel_size: 32,
            no_color: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            log_level: "warn".into(),
            log_json: false,
            write_channel_size: 64,
            reader_pool_size: 4,
            notify_channel_size: 256,
            no_color: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.db_path(), PathBuf::from("./data").join("notes.db"));
        assert!(!config.no_color);
    }

    #[test]
    fn test_parse_overrides() {
        let config = Config::try_parse_from([
            "stickynote",
            "--data-dir",
            "/tmp/notes",
            "--reader-pool-size",
            "8",
            "--no-color",
            "--log-json",
        ])
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/notes"));
        assert_eq!(config.reader_pool_size, 8);
        assert!(config.no_color);
        assert!(config.log_json);
    }
}
