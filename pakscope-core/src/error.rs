//! Error types for pakscope

use thiserror::Error;

/// Result type alias for pakscope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pakscope
#[derive(Error, Debug)]
pub enum Error {
    /// Packet id is negative or past the end of the log
    #[error("Packet id {id} out of range (store holds {len} packets)")]
    OutOfRange { id: i64, len: usize },

    /// No proxy session has been selected yet
    #[error("No proxy session is running: {0}")]
    NotReady(String),

    /// Unknown proxy backend name
    #[error("Unknown proxy backend '{0}'")]
    UnknownBackend(String),

    /// Resource already exists
    #[error("Resource already exists: {0}")]
    AlreadyExists(String),

    /// Malformed inspector or upstream message
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// JSON encoding/decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Network I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A queue or channel was closed on the other side
    #[error("Channel closed: {0}")]
    ChannelClosed(String),
}

impl Error {
    /// Create a not-ready error for the named operation
    pub fn not_ready<S: Into<String>>(operation: S) -> Self {
        Error::NotReady(operation.into())
    }

    /// Create an invalid message error
    pub fn invalid_message<S: Into<String>>(msg: S) -> Self {
        Error::InvalidMessage(msg.into())
    }

    /// True for errors that mean "no such packet"
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Error::OutOfRange { .. })
    }
}
