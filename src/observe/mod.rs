//! Change notification and live note feeds.
//!
//! Provides:
//! - Change bus announcing committed writes
//! - Shared live collection re-read on every change

pub mod live;
pub mod notify;

pub use live::{LiveNotes, NotesObserver};
