//! Terminal controller
//!
//! A [`TerminalController`] is bound to one output stream for its whole
//! lifetime. Color capability is decided once, at construction, and never
//! re-evaluated. Every operation composes its bytes up front and issues a
//! single write followed by a flush, so sequential calls land on the stream
//! in call order with nothing held back between calls.

use std::io::Write;
use std::os::fd::AsFd;

use crate::capability::{self, ColorMode, Env, OsEnv};
use crate::color::Color;
use crate::error::{TermError, TermResult};
use crate::escape::{self, EscapeSequence};

/// Writes colored text and cursor/line control to a stream
#[derive(Debug)]
pub struct TerminalController<W: Write> {
    stream: W,
    color_capable: bool,
}

impl<W: Write + AsFd> TerminalController<W> {
    /// Bind to a descriptor-backed stream, detecting color capability from
    /// the descriptor and the process environment.
    ///
    /// Fails if the descriptor is closed or otherwise unusable.
    pub fn new(stream: W) -> TermResult<Self> {
        Self::with_env(stream, &OsEnv)
    }

    /// Like [`TerminalController::new`], reading `TERM` from `env`
    pub fn with_env(stream: W, env: &dyn Env) -> TermResult<Self> {
        Self::with_mode(stream, ColorMode::Auto, env)
    }

    /// Bind with an explicit color policy
    pub fn with_mode(stream: W, mode: ColorMode, env: &dyn Env) -> TermResult<Self> {
        if let Err(e) = capability::validate(&stream) {
            tracing::debug!(error = %e, "rejecting unusable stream");
            return Err(TermError::InvalidStream(e));
        }
        let color_capable = capability::resolve(&stream, mode, env);
        tracing::debug!(?mode, color_capable, "terminal controller bound");
        Ok(Self {
            stream,
            color_capable,
        })
    }
}

impl<W: Write> TerminalController<W> {
    /// Bind to a sink with no descriptor, such as an in-memory buffer.
    ///
    /// Such a sink is never a terminal, so color is always off.
    pub fn detached(stream: W) -> Self {
        tracing::debug!("terminal controller bound to detached sink");
        Self {
            stream,
            color_capable: false,
        }
    }

    /// Whether this controller emits color escape codes
    pub fn is_color_capable(&self) -> bool {
        self.color_capable
    }

    /// Write `text`, wrapped in `color` when the stream supports it
    pub fn write(&mut self, text: &str, color: Color) -> TermResult<()> {
        let out = self.wrap(text, color);
        self.emit(&out)
    }

    /// Compose `text` in `color` without touching the stream.
    ///
    /// Returns `text` unchanged when color is off or `color` is `NoColor`.
    pub fn wrap(&self, text: &str, color: Color) -> String {
        if !self.color_capable {
            return text.to_string();
        }
        escape::wrap(text, color)
    }

    /// Erase the current line and return to column 0.
    ///
    /// Emitted regardless of color capability.
    pub fn clear_line(&mut self) -> TermResult<()> {
        self.emit(&escape::clear_line())
    }

    /// End the current line with `\r\n`
    pub fn end_line(&mut self) -> TermResult<()> {
        self.emit(&EscapeSequence::Newline.encode())
    }

    /// Move the cursor up `n` rows.
    ///
    /// `n == 0` is not elided: the literal `ESC[0A` is written.
    pub fn move_cursor_up(&mut self, n: u16) -> TermResult<()> {
        self.emit(&EscapeSequence::CursorUp(n).encode())
    }

    /// Borrow the underlying stream
    pub fn get_ref(&self) -> &W {
        &self.stream
    }

    /// Mutably borrow the underlying stream
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.stream
    }

    /// Release the controller, returning the stream
    pub fn into_inner(self) -> W {
        self.stream
    }

    fn emit(&mut self, out: &str) -> TermResult<()> {
        tracing::trace!(bytes = out.len(), "emit");
        self.stream.write_all(out.as_bytes())?;
        self.stream.flush()?;
        Ok(())
    }
}
