//! Text rendering of the note board: a two-column grid of cards.

use std::fmt::Write;

use super::palette::{NoteColor, ANSI_RESET};
use crate::model::Note;

const CARD_WIDTH: usize = 30;
const DESCRIPTION_LINES: usize = 4;
const COLUMNS: usize = 2;
const GUTTER: &str = "  ";

/// Render the whole board.
///
/// With `color` set, cards get their palette color as an ANSI background;
/// otherwise they are framed with `|`.
pub fn render_board(notes: &[Note], color: bool) -> String {
    let mut out = String::new();
    out.push_str("My Notes\n");
    let _ = writeln!(out, "{} saved", count_label(notes.len()));
    out.push('\n');

    if notes.is_empty() {
        out.push_str("Nothing here yet...\n");
        return out;
    }

    for row in notes.chunks(COLUMNS) {
        let cards: Vec<Vec<String>> = row.iter().map(card_lines).collect();
        for line in 0..=DESCRIPTION_LINES {
            let painted: Vec<String> = row
                .iter()
                .zip(&cards)
                .map(|(note, card)| paint(&card[line], NoteColor::for_id(note.id), color))
                .collect();
            out.push_str(&painted.join(GUTTER));
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

/// Render a single note in full.
pub fn render_note(note: &Note) -> String {
    let color = NoteColor::for_id(note.id);
    let mut out = format!("#{} [{}]\n{}\n", note.id, color.name(), note.title);
    if !note.description.is_empty() {
        out.push('\n');
        out.push_str(&note.description);
        out.push('\n');
    }
    out
}

fn count_label(count: usize) -> String {
    if count == 1 {
        "1 note".to_string()
    } else {
        format!("{count} notes")
    }
}

/// Title line followed by a fixed number of description lines, each padded
/// to the card's inner width.
fn card_lines(note: &Note) -> Vec<String> {
    let inner = CARD_WIDTH - 2;
    let mut lines = Vec::with_capacity(DESCRIPTION_LINES + 1);
    lines.push(fit(&format!("#{} {}", note.id, note.title), inner));

    let mut description = wrap(&note.description, inner, DESCRIPTION_LINES);
    description.resize(DESCRIPTION_LINES, String::new());
    lines.extend(description.iter().map(|line| fit(line, inner)));
    lines
}

fn paint(line: &str, color: NoteColor, enabled: bool) -> String {
    if enabled {
        format!("{} {line} {ANSI_RESET}", color.ansi_background())
    } else {
        format!("|{line}|")
    }
}

/// Pad to exactly `width` characters, ellipsizing longer text.
fn fit(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len > width {
        ellipsize(text, width)
    } else {
        let mut padded = text.to_string();
        padded.extend(std::iter::repeat(' ').take(width - len));
        padded
    }
}

fn ellipsize(text: &str, width: usize) -> String {
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Word-wrap into at most `max_lines` lines of `width` characters.
fn wrap(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let current_len = current.chars().count();
        let word_len = word.chars().count();
        let needed = if current.is_empty() {
            word_len
        } else {
            current_len + 1 + word_len
        };

        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > width {
            lines.push(chars.drain(..width).collect());
        }
        current = chars.into_iter().collect();
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            *last = ellipsize(last, width);
        }
    }
    lines
}
