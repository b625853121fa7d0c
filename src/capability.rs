//! Terminal capability detection
//!
//! Decides whether an output descriptor is an interactive terminal and
//! whether ANSI color should be emitted to it. Detection is a pure query
//! against OS state and the process environment; any failed query answers
//! `false` so escape codes never reach a file or pipe.

use std::collections::HashMap;
use std::io::IsTerminal;
use std::os::fd::{AsFd, AsRawFd};

use nix::fcntl::{fcntl, FcntlArg};
use serde::{Deserialize, Serialize};

/// Source of environment variables
pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEnv;

impl Env for OsEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Env for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// How a controller decides whether to emit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Emit color only when the stream is a color-capable terminal
    #[default]
    Auto,
    /// Always emit color
    Always,
    /// Never emit color
    Never,
}

impl std::str::FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            other => Err(format!("Unknown color mode: {other}")),
        }
    }
}

/// Check that the descriptor refers to an open file
pub fn validate<F: AsFd>(stream: &F) -> nix::Result<()> {
    fcntl(stream.as_fd().as_raw_fd(), FcntlArg::F_GETFD).map(|_| ())
}

/// Whether the descriptor is an interactive terminal.
///
/// A failed query counts as "not a terminal".
pub fn is_terminal<F: AsFd>(stream: &F) -> bool {
    stream.as_fd().is_terminal()
}

/// Whether `TERM` names a terminal that understands ANSI color
pub fn term_supports_color(env: &dyn Env) -> bool {
    !matches!(env.var("TERM").as_deref(), Some("dumb"))
}

/// Color capability of `stream` using the process environment
pub fn detect<F: AsFd>(stream: &F) -> bool {
    detect_with_env(stream, &OsEnv)
}

/// Color capability of `stream`: a terminal whose `TERM` is not `dumb`
pub fn detect_with_env<F: AsFd>(stream: &F, env: &dyn Env) -> bool {
    let is_tty = is_terminal(stream);
    let color = is_tty && term_supports_color(env);
    tracing::debug!(is_tty, color, "detected terminal capability");
    color
}

/// Resolve a `ColorMode` into the controller's capability flag
pub fn resolve<F: AsFd>(stream: &F, mode: ColorMode, env: &dyn Env) -> bool {
    match mode {
        ColorMode::Auto => detect_with_env(stream, env),
        ColorMode::Always => true,
        ColorMode::Never => false,
    }
}
