//! Core error types for barrier-core.
//!
//! Transition requests never fail: they are accepted or rejected as a no-op
//! (see [`crate::barrier::TransitionOutcome`]). The errors here cover the
//! ambient layer only.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for barrier-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// The service task is no longer running.
    #[error("Barrier service has stopped")]
    ServiceStopped,

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for CoreError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        CoreError::ServiceStopped
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for CoreError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        CoreError::ServiceStopped
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_into_core_error() {
        let err: CoreError = ConfigError::UnknownKey("log.size".into()).into();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
        assert_eq!(
            err.to_string(),
            "Configuration error: Unknown configuration key: log.size"
        );
    }

    #[test]
    fn closed_channel_maps_to_service_stopped() {
        let err: CoreError = tokio::sync::mpsc::error::SendError(1u8).into();
        assert!(matches!(err, CoreError::ServiceStopped));
    }
}
