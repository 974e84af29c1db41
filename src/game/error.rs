//! Error types for game module
//!
//! Covers square and notation decoding, move validation and the engine
//! boundary. Only [`GameError::EngineStartupFailure`] is fatal; everything
//! else is recovered by the session and reported to the player.

use uci_bridge::BridgeError;

/// Errors that can occur in game logic
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Square index outside 0..=63
    #[error("Invalid square index {square}")]
    InvalidSquare { square: u16 },

    /// Text that is not a square name, UCI move or FEN
    #[error("Invalid notation '{notation}'")]
    InvalidNotation { notation: String },

    /// Well-formed move the rules reject in the current position
    #[error("Invalid move {uci}: {reason}")]
    InvalidMove { uci: String, reason: String },

    /// The engine process could not be launched or did not speak UCI
    #[error("Engine failed to start: {source}")]
    EngineStartupFailure {
        #[source]
        source: BridgeError,
    },

    /// The running engine could not serve a request
    #[error("Engine communication failed: {message}")]
    EngineCommunicationFailure { message: String },
}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
