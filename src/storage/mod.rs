//! SQLite storage layer.
//!
//! Provides:
//! - Schema initialization and pragmas
//! - Dedicated writer thread for all mutations
//! - Read connection pool for queries
//! - [`Storage`], the process-wide handle tying them to the change bus

pub mod reader;
pub mod schema;
pub mod writer;

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::Config;
use crate::observe::notify::ChangeBus;
use crate::repository::NoteRepository;
use reader::{ReaderError, ReaderPool};
use writer::{Writer, WriterError};

/// Error type for opening storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Writer(#[from] WriterError),

    #[error(transparent)]
    Reader(#[from] ReaderError),
}

/// The shared storage handle: writer thread, reader pool and change bus.
///
/// Open once per process and hand out [`NoteRepository`] clones.
pub struct Storage {
    db_path: PathBuf,
    writer: Writer,
    reader_pool: ReaderPool,
    bus: ChangeBus,
}

impl Storage {
    /// Open (or create) the notes database described by `config`.
    pub fn open(config: &Config) -> Result<Self, StorageError> {
        Self::open_path(
            config.db_path(),
            config.write_channel_size,
            config.reader_pool_size,
            config.notify_channel_size,
        )
    }

    /// Open (or create) the notes database at `db_path`.
    ///
    /// The writer is started first so the file and schema exist before the
    /// read-only pool connects.
    pub fn open_path<P: AsRef<Path>>(
        db_path: P,
        write_channel_size: usize,
        reader_pool_size: u32,
        notify_channel_size: usize,
    ) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref().to_path_buf();
        let bus = ChangeBus::new(notify_channel_size);
        let writer = Writer::spawn(&db_path, bus.clone(), write_channel_size)?;
        let reader_pool = ReaderPool::new(&db_path, reader_pool_size)?;

        tracing::info!(path = %db_path.display(), "Storage opened");

        Ok(Self {
            db_path,
            writer,
            reader_pool,
            bus,
        })
    }

    /// Path of the database file.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// A repository bound to this storage.
    pub fn repository(&self) -> NoteRepository {
        NoteRepository::new(
            self.writer.handle(),
            self.reader_pool.clone(),
            self.bus.clone(),
        )
    }

    /// Drain queued writes and stop the writer thread.
    pub async fn close(self) -> Result<(), WriterError> {
        let pool = self.reader_pool.state();
        tracing::info!(
            readers = pool.connections,
            idle_readers = pool.idle_connections,
            "Shutting down writer thread"
        );
        self.writer.handle().shutdown().await?;
        let writer = self.writer;
        tokio::task::spawn_blocking(move || writer.join())
            .await
            .map_err(|_| WriterError::ThreadPanic)??;
        tracing::info!(path = %self.db_path.display(), "Storage closed");
        Ok(())
    }
}
