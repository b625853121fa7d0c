//! Error types for terminal control

use std::io;

use thiserror::Error;

/// Errors raised while binding to or writing through a stream
#[derive(Error, Debug)]
pub enum TermError {
    /// The descriptor behind the stream is closed or otherwise invalid
    #[error("Stream is not usable: {0}")]
    InvalidStream(#[source] nix::Error),

    /// The underlying write or flush failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for terminal control operations
pub type TermResult<T> = Result<T, TermError>;
