//! Terminal output control library
//!
//! Emits colored text, moves the cursor and clears lines on an interactive
//! terminal, and falls back to plain text when output is redirected to a
//! file, a pipe or an in-memory buffer.
//!
//! - `color`: the fixed foreground palette
//! - `capability`: TTY and color capability detection
//! - `escape`: ANSI escape sequence encoding
//! - `decode`: streaming decoder for the sequences `escape` produces
//! - `controller`: the terminal controller bound to one output stream
//! - `text`: small string helpers for formatting messages
//! - `pty`: pseudo-terminal pair for exercising the controller in tests

pub mod capability;
pub mod color;
pub mod controller;
pub mod decode;
pub mod error;
pub mod escape;
#[cfg(unix)]
pub mod pty;
pub mod text;

pub use capability::{ColorMode, Env, OsEnv};
pub use color::Color;
pub use controller::TerminalController;
pub use decode::{Decoder, Segment};
pub use error::{TermError, TermResult};
pub use escape::EscapeSequence;
