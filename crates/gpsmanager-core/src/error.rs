//! Error handling for GPSManager
//!
//! Provides the error types shared across the application layers:
//! - Storage errors (polygon persistence backends)
//! - Feed errors (position feed connections)
//!
//! "Not found" outcomes are never errors here; store operations report them
//! as `false`. All error types use `thiserror`.

use thiserror::Error;

/// Storage error type
///
/// Raised by a polygon store backend when the underlying medium fails.
/// The operation that produced it has been aborted and the store state is
/// unchanged beyond the last successful mutation.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend cannot be reached or opened
    #[error("Storage unavailable: {reason}")]
    Unavailable {
        /// Why the backend is unavailable.
        reason: String,
    },

    /// Persisted data could not be interpreted
    #[error("Storage corrupted: {reason}")]
    Corrupted {
        /// Description of the corruption.
        reason: String,
    },

    /// Every identifier above the largest stored one is taken
    #[error("No polygon id left after {last}")]
    IdsExhausted {
        /// The largest stored id.
        last: i64,
    },

    /// I/O failure while reading or writing the backing medium
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Build an `Unavailable` error from any message.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        StorageError::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Position feed error type
///
/// Represents failures of the transport behind a position feed. Feeds
/// surface these as a `Disconnected` transition; the error itself is only
/// logged.
#[derive(Error, Debug, Clone)]
pub enum FeedError {
    /// Connection attempt timed out
    #[error("Connection timeout after {timeout_ms}ms")]
    ConnectionTimeout {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Remote end refused or reset the connection
    #[error("Connection refused by {address}: {reason}")]
    ConnectionRefused {
        /// The address that was dialed.
        address: String,
        /// The reason reported by the OS.
        reason: String,
    },

    /// Established connection was lost
    #[error("Connection lost: {reason}")]
    ConnectionLost {
        /// The reason the connection was lost.
        reason: String,
    },

    /// Host/port pair could not be used
    #[error("Invalid address: {address}")]
    InvalidAddress {
        /// The rejected address.
        address: String,
    },

    /// I/O error
    #[error("I/O error: {reason}")]
    Io {
        /// The reason for the I/O error.
        reason: String,
    },
}

impl From<std::io::Error> for FeedError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut => FeedError::ConnectionTimeout { timeout_ms: 0 },
            std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::BrokenPipe => FeedError::ConnectionLost {
                reason: err.to_string(),
            },
            _ => FeedError::Io {
                reason: err.to_string(),
            },
        }
    }
}
