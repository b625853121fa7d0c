//! Pseudo-terminal pair for tests
//!
//! Gives the controller a real terminal device to write to (the slave side)
//! while the test reads back exactly what was written (the master side).
//! This is the only way to make capability detection answer `true` without
//! a terminal attached to the test process.

#[cfg(unix)]
mod unix;

#[cfg(unix)]
pub use unix::PseudoTerminal;

/// Error type for pseudo-terminal operations
#[derive(Debug, thiserror::Error)]
pub enum PtyError {
    #[error("Failed to open PTY master: {0}")]
    OpenMaster(#[source] nix::Error),

    #[error("Failed to grant PTY access: {0}")]
    GrantPty(#[source] nix::Error),

    #[error("Failed to unlock PTY: {0}")]
    UnlockPty(#[source] nix::Error),

    #[error("Failed to get PTY slave name: {0}")]
    PtsName(#[source] nix::Error),

    #[error("Failed to open PTY slave: {0}")]
    OpenSlave(#[source] std::io::Error),

    #[error("Failed to set terminal attributes: {0}")]
    Termios(#[source] nix::Error),

    #[error("Failed to poll: {0}")]
    Poll(#[source] nix::Error),

    #[error("Failed to duplicate PTY master: {0}")]
    Dup(#[source] std::io::Error),

    #[error("Failed to read from PTY: {0}")]
    Read(#[source] std::io::Error),
}

/// Result type for pseudo-terminal operations
pub type PtyResult<T> = Result<T, PtyError>;
