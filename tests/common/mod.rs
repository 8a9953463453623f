//! Test utilities for stickynote integration tests.
//!
//! Provides:
//! - Temporary database fixtures
//! - Opened storage plus service wiring
//! - Timed waits on the live note feed

#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;
use stickynote::config::Config;
use stickynote::observe::NotesObserver;
use stickynote::{Note, NoteService, Storage};
use tempfile::TempDir;

/// How long tests wait for a snapshot before failing.
pub const WAIT: Duration = Duration::from_secs(5);

/// Test fixture that manages a temporary data directory.
///
/// The directory is automatically cleaned up when the fixture is dropped.
pub struct TestFixture {
    /// Temporary data directory
    pub temp_dir: TempDir,
    /// Configuration rooted at the temporary directory
    pub config: Config,
}

impl TestFixture {
    /// Create a new test fixture with a temporary data directory.
    pub fn new() -> Self {
        stickynote::observability::tracing::init_test_tracing();
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let config = Config::test_config(temp_dir.path().to_path_buf());
        Self { temp_dir, config }
    }

    /// Path to the database file.
    pub fn db_path(&self) -> PathBuf {
        self.config.db_path()
    }

    /// Open storage and a service on top of it.
    pub fn open(&self) -> (Storage, NoteService) {
        let storage = Storage::open(&self.config).expect("failed to open storage");
        let service = NoteService::new(storage.repository());
        (storage, service)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait until the observer's snapshot satisfies `predicate`, panicking on timeout.
pub async fn wait_for_notes<F>(observer: &mut NotesObserver, predicate: F) -> Vec<Note>
where
    F: FnMut(&[Note]) -> bool,
{
    tokio::time::timeout(WAIT, observer.wait_for(predicate))
        .await
        .expect("timed out waiting for note snapshot")
}

/// Ids of a snapshot, in order.
pub fn ids(notes: &[Note]) -> Vec<i64> {
    notes.iter().map(|note| note.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.temp_dir.path().exists());
        assert!(fixture.db_path().ends_with("notes.db"));
    }
}
