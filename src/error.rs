//! Error types for scpsource
//!
//! Provides a unified error type for all session operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using ScpError
pub type Result<T> = std::result::Result<T, ScpError>;

/// Unified error type for scpsource operations
#[derive(Debug, Error)]
pub enum ScpError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Wire Errors
    // -------------------------------------------------------------------------
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    /// Peer replied 0x01. The message keeps its line terminator.
    #[error("Remote error: {}", .0.trim_end())]
    Remote(String),

    /// Peer replied 0x02 and is abandoning the session.
    #[error("Remote fatal error: {}", .0.trim_end())]
    RemoteFatal(String),

    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    #[error("Logic error: {0}")]
    Logic(String),

    #[error("Session is faulted; no further directives may be issued")]
    Faulted,

    // -------------------------------------------------------------------------
    // Local Source Errors
    // -------------------------------------------------------------------------
    /// A local file could not be inspected or opened. The wire is untouched.
    #[error("Cannot read {}: {source}", .path.display())]
    Source {
        path: PathBuf,
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Harness Errors
    // -------------------------------------------------------------------------
    #[error("Peer process error: {0}")]
    Peer(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScpError {
    /// Whether this error ends the session.
    ///
    /// `Remote` leaves the peer usable; `Logic`, `Source` and `Config` never
    /// touch the wire.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScpError::Io(_)
                | ScpError::ProtocolViolation(_)
                | ScpError::RemoteFatal(_)
                | ScpError::Faulted
        )
    }

    /// The message text the peer supplied, if this is a remote error
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            ScpError::Remote(msg) | ScpError::RemoteFatal(msg) => Some(msg),
            _ => None,
        }
    }
}
