//! Error types shared between the client and the bus plumbing.
//!
//! The `TickrError` enum unifies common failure cases for I/O, transport,
//! codec work, and user input, allowing crates to propagate a single error
//! type.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared across the workspace.
#[derive(Error, Debug)]
pub enum TickrError {
    /// I/O error originating from the standard library or sockets.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// User gave an unknown verb, a missing argument, or an invalid symbol.
    #[error("Invalid input: {0}")]
    InputFormat(String),

    /// Send or connect failure on the bus; contains a short context string.
    #[error("Transport failed: {0}")]
    TransportFailed(String),

    /// An inbound frame could not be parsed into a message.
    #[error("JSON serialization/deserialization error: {0}")]
    DecodeFailed(#[from] serde_json::Error),

    /// An `Error` message received from the DataService.
    #[error("Service error: {0}")]
    Service(String),

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl<T> From<PoisonError<T>> for TickrError {
    fn from(err: PoisonError<T>) -> Self {
        TickrError::MutexLock(err.to_string())
    }
}
