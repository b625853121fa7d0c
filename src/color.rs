//! Foreground colors
//!
//! The palette is the eight standard ANSI foreground colors (SGR 30-37),
//! the terminal's default foreground (SGR 39), and `NoColor`, which leaves
//! text untouched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A foreground color from the fixed ANSI palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Pass-through: no escape codes are emitted
    #[default]
    NoColor,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    /// The terminal's configured default foreground
    Default,
}

impl Color {
    /// Every palette entry, `NoColor` first
    pub const ALL: [Color; 10] = [
        Color::NoColor,
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
        Color::Default,
    ];

    /// SGR foreground code, or `None` for `NoColor`
    pub const fn code(self) -> Option<u8> {
        match self {
            Color::NoColor => None,
            Color::Black => Some(30),
            Color::Red => Some(31),
            Color::Green => Some(32),
            Color::Yellow => Some(33),
            Color::Blue => Some(34),
            Color::Magenta => Some(35),
            Color::Cyan => Some(36),
            Color::White => Some(37),
            Color::Default => Some(39),
        }
    }

    /// Inverse of [`Color::code`]
    pub const fn from_code(code: u8) -> Option<Color> {
        match code {
            30 => Some(Color::Black),
            31 => Some(Color::Red),
            32 => Some(Color::Green),
            33 => Some(Color::Yellow),
            34 => Some(Color::Blue),
            35 => Some(Color::Magenta),
            36 => Some(Color::Cyan),
            37 => Some(Color::White),
            39 => Some(Color::Default),
            _ => None,
        }
    }

    /// Lowercase name, as accepted by `FromStr`
    pub const fn name(self) -> &'static str {
        match self {
            Color::NoColor => "nocolor",
            Color::Black => "black",
            Color::Red => "red",
            Color::Green => "green",
            Color::Yellow => "yellow",
            Color::Blue => "blue",
            Color::Magenta => "magenta",
            Color::Cyan => "cyan",
            Color::White => "white",
            Color::Default => "default",
        }
    }

    /// Whether wrapping text in this color emits escape codes
    pub const fn is_pass_through(self) -> bool {
        matches!(self, Color::NoColor)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a color name is not in the palette
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown color: {0}")]
pub struct UnknownColor(pub String);

impl FromStr for Color {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "none" {
            return Ok(Color::NoColor);
        }
        Color::ALL
            .into_iter()
            .find(|c| c.name() == lower)
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}
