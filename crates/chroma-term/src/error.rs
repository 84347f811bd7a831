// SPDX-License-Identifier: MIT
//
// Error types for chroma-term.

use std::io;

use thiserror::Error;

/// Errors raised while driving the terminal.
#[derive(Error, Debug)]
pub enum TermError {
    /// Writing to or configuring the terminal failed.
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The OS refused to start the stdin reader thread.
    #[error("failed to spawn stdin reader thread: {0}")]
    ReaderSpawn(#[source] io::Error),

    /// stdin is not attached to a terminal, so there is no pointer to track.
    #[error("stdin is not a terminal")]
    NotATerminal,
}

/// Result alias used throughout chroma-term.
pub type Result<T> = std::result::Result<T, TermError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert() {
        let err: TermError = io::Error::new(io::ErrorKind::BrokenPipe, "gone").into();
        assert!(matches!(err, TermError::Io(_)));
        assert_eq!(err.to_string(), "terminal I/O failed: gone");
    }

    #[test]
    fn reader_spawn_keeps_source() {
        use std::error::Error as _;
        let err = TermError::ReaderSpawn(io::Error::other("no threads"));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("failed to spawn stdin reader"));
    }

    #[test]
    fn not_a_terminal_message() {
        assert_eq!(TermError::NotATerminal.to_string(), "stdin is not a terminal");
    }
}
