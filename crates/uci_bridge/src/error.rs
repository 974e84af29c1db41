//! Error types for the engine bridge
//!
//! Covers process startup, the UCI handshake and the request/response cycle.
//! Termination failures are never reported; see [`crate::EngineBridge::stop`].

use thiserror::Error;

/// Errors that can occur while talking to a UCI engine process
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The engine executable could not be launched
    #[error("Failed to launch engine '{path}': {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine answered the handshake with something unexpected
    #[error("UCI handshake failed: {message}")]
    Handshake { message: String },

    /// The engine did not answer in time
    #[error("Timed out waiting for '{waiting_for}' from engine")]
    Timeout { waiting_for: &'static str },

    /// Engine output ended or the driver task is gone
    #[error("Engine process disconnected")]
    Disconnected,

    /// Reading from or writing to the engine pipes failed
    #[error("Engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A best-move request is already outstanding
    #[error("A best-move request is already in flight")]
    RequestInFlight,
}

/// Result type alias for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;
