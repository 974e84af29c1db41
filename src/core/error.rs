//! Error types for core module
//!
//! Covers settings persistence: reading, writing and validating the JSON
//! settings file.

use thiserror::Error;

/// Errors that can occur in the core module
#[derive(Error, Debug)]
pub enum CoreError {
    /// Settings file I/O error
    #[error("Settings I/O error: {0}")]
    SettingsIo(#[from] std::io::Error),

    /// Settings serialization/deserialization error
    #[error("Settings serialization error: {0}")]
    SettingsSerialization(#[from] serde_json::Error),

    /// A setting holds a value the game cannot run with
    #[error("Invalid setting '{field}': {message}")]
    InvalidSetting {
        field: &'static str,
        message: String,
    },
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
