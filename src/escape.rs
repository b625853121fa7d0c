//! ANSI escape sequence encoding
//!
//! Pure mapping from a control operation to the literal bytes a terminal
//! interprets. Nothing here performs I/O.
//!
//! | Operation        | Output       |
//! |------------------|--------------|
//! | `SetColor(c)`    | `ESC[<c>m`   |
//! | `Reset`          | `ESC[0m`     |
//! | `ClearLine`      | `ESC[2K`     |
//! | `CursorUp(n)`    | `ESC[<n>A`   |
//! | `CarriageReturn` | `\r`         |
//! | `Newline`        | `\r\n`       |
//!
//! # References
//!
//! - ECMA-48, sections 8.3.117 (SGR), 8.3.41 (EL), 8.3.22 (CUU)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// The escape character (0x1B)
pub const ESC: char = '\x1b';

/// Control Sequence Introducer
pub const CSI: &str = "\x1b[";

/// A single terminal control operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscapeSequence {
    /// Set the foreground color; `NoColor` encodes to nothing
    SetColor(Color),
    /// Reset all attributes
    Reset,
    /// Erase the entire current line
    ClearLine,
    /// Move the cursor up `n` rows
    CursorUp(u16),
    /// Return to column 0
    CarriageReturn,
    /// Carriage return followed by line feed
    Newline,
}

impl EscapeSequence {
    /// Encode to the literal output string
    pub fn encode(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EscapeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            EscapeSequence::SetColor(color) => match color.code() {
                Some(code) => write!(f, "{CSI}{code}m"),
                None => Ok(()),
            },
            EscapeSequence::Reset => write!(f, "{CSI}0m"),
            EscapeSequence::ClearLine => write!(f, "{CSI}2K"),
            EscapeSequence::CursorUp(n) => write!(f, "{CSI}{n}A"),
            EscapeSequence::CarriageReturn => f.write_str("\r"),
            EscapeSequence::Newline => f.write_str("\r\n"),
        }
    }
}

/// Wrap `text` in `color`, always closing with a reset.
///
/// `NoColor` returns the text unchanged. Empty text is still wrapped so no
/// color state leaks into whatever is written next.
pub fn wrap(text: &str, color: Color) -> String {
    if color.is_pass_through() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 9);
    out.push_str(&EscapeSequence::SetColor(color).encode());
    out.push_str(text);
    out.push_str(&EscapeSequence::Reset.encode());
    out
}

/// Bytes emitted by a line clear: erase, then return to column 0
pub fn clear_line() -> String {
    let mut out = EscapeSequence::ClearLine.encode();
    out.push_str(&EscapeSequence::CarriageReturn.encode());
    out
}
