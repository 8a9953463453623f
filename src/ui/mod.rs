//! Terminal presentation of the note board.
//!
//! Presentation state stays here; the core only sees intents.

pub mod board;
pub mod command;
pub mod palette;

pub use board::{render_board, render_note};
pub use command::{parse_command, Command, ParseError, HELP};
pub use palette::NoteColor;
