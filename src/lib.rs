//! Stickynote: short text notes on SQLite with a live, shared note feed.
//!
//! Every write goes through a dedicated writer thread; every committed change
//! is announced on a broadcast bus, and a single shared subscription re-reads
//! the whole note list and hands the fresh snapshot to all observers.
//!
//! # Architecture
//!
//! - **Single writer**: one SQLite connection owns all mutations
//! - **Pooled readers**: r2d2 pool of read-only connections for queries
//! - **Live feed**: one pump per feed, started by the first observer and
//!   cancelled when the last one leaves
//!
//! # Modules
//!
//! - [`app`]: interactive board lifecycle
//! - [`config`]: CLI and environment configuration
//! - [`model`]: the `Note` record
//! - [`observability`]: tracing setup
//! - [`observe`]: change bus and shared live collection
//! - [`repository`]: the four note access operations
//! - [`service`]: validation and mutation orchestration
//! - [`storage`]: SQLite schema, writer thread and reader pool
//! - [`ui`]: board rendering, color palette and command parsing

// Lint configuration
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions,    // repository::NoteRepository is fine
    clippy::must_use_candidate,         // Not all functions need #[must_use]
    clippy::missing_errors_doc,         // Error docs can be verbose
    clippy::missing_panics_doc,         // Panic docs can be verbose
    clippy::needless_raw_string_hashes  // r#""# is fine for SQL
)]

pub mod app;
pub mod config;
pub mod model;
pub mod observability;
pub mod observe;
pub mod repository;
pub mod service;
pub mod storage;
pub mod ui;

pub use model::Note;
pub use repository::{NoteRepository, StoreError};
pub use service::{NoteService, Outcome, Skip};
pub use storage::Storage;
