//! Error types for dictclient
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using DictError
pub type Result<T> = std::result::Result<T, DictError>;

/// Unified error type for dictclient operations
#[derive(Debug, Error)]
pub enum DictError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection is not open")]
    NotConnected,

    #[error("Invalid connection state: {0}")]
    InvalidState(String),

    // -------------------------------------------------------------------------
    // Usage Errors
    // -------------------------------------------------------------------------
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Server banner carried no connection id; AUTH is unavailable")]
    MissingConnectionId,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Malformed status line: {0:?}")]
    MalformedStatusLine(String),

    #[error("Server replied {code} {message}")]
    Status { code: u16, message: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DictError {
    /// Whether this error came from the transport timing out
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            DictError::Io(e) if matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            )
        )
    }
}
