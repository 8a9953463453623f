//! Pastel colors for note cards.
//!
//! A note's color is picked from its id, so it never changes while the
//! note exists.

use serde::Serialize;

/// One of the six card colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteColor {
    Yellow,
    Cyan,
    Pink,
    Green,
    Purple,
    Orange,
}

const PALETTE: [NoteColor; 6] = [
    NoteColor::Yellow,
    NoteColor::Cyan,
    NoteColor::Pink,
    NoteColor::Green,
    NoteColor::Purple,
    NoteColor::Orange,
];

impl NoteColor {
    /// Color for the note with `id`.
    pub fn for_id(id: i64) -> Self {
        PALETTE[id.rem_euclid(PALETTE.len() as i64) as usize]
    }

    /// RGB components.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Yellow => (0xFF, 0xF5, 0x9D),
            Self::Cyan => (0x80, 0xDE, 0xEA),
            Self::Pink => (0xF4, 0x8F, 0xB1),
            Self::Green => (0xA5, 0xD6, 0xA7),
            Self::Purple => (0xCE, 0x93, 0xD8),
            Self::Orange => (0xFF, 0xCC, 0x80),
        }
    }

    /// `#RRGGBB` form.
    pub fn hex(self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{r:02X}{g:02X}{b:02X}")
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Cyan => "cyan",
            Self::Pink => "pink",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Orange => "orange",
        }
    }

    /// Truecolor ANSI escape setting this color as background with dark text.
    pub fn ansi_background(self) -> String {
        let (r, g, b) = self.rgb();
        format!("\x1b[48;2;{r};{g};{b}m\x1b[38;2;30;30;30m")
    }
}

/// Resets ANSI styling.
pub const ANSI_RESET: &str = "\x1b[0m";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_cycles_by_id() {
        assert_eq!(NoteColor::for_id(0), NoteColor::Yellow);
        assert_eq!(NoteColor::for_id(1), NoteColor::Cyan);
        assert_eq!(NoteColor::for_id(5), NoteColor::Orange);
        assert_eq!(NoteColor::for_id(6), NoteColor::Yellow);
        assert_eq!(NoteColor::for_id(13), NoteColor::Cyan);
    }

    #[test]
    fn test_hex() {
        assert_eq!(NoteColor::Yellow.hex(), "#FFF59D");
        assert_eq!(NoteColor::Purple.hex(), "#CE93D8");
    }

    #[test]
    fn test_serializes_as_name() {
        for color in PALETTE {
            let json = serde_json::to_string(&color).unwrap();
            assert_eq!(json, format!("\"{}\"", color.name()));
        }
    }
}
