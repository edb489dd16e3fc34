//! Core error types for timepilot-core.
//!
//! This module defines the error hierarchy used across the library using
//! thiserror. The layout engine itself never fails; errors come from input
//! validation at the event boundary, the REST client, credential storage and
//! configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for timepilot-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// REST API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Credential storage errors
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors raised by the TimePilot backend client.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (connection refused, TLS, decode)
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The base URL or an endpoint path could not be joined
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Non-2xx HTTP status
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// The envelope was delivered but the backend refused the operation
    #[error("{endpoint} rejected with code {code}: {message}")]
    Rejected {
        endpoint: String,
        code: String,
        message: String,
    },

    /// Success envelope without the `data` payload
    #[error("{endpoint} returned no data")]
    MissingData { endpoint: String },

    /// An authenticated call was attempted without stored tokens
    #[error("Not logged in")]
    NotAuthenticated,

    /// Credential storage failed while persisting or reading tokens
    #[error(transparent)]
    Credential(#[from] CredentialError),
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

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Credential storage errors.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// OS keyring failure
    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// Stored value could not be decoded
    #[error("stored credentials are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end ({end}) must be greater than start ({start})")]
    InvalidTimeRange { start: i64, end: i64 },

    /// Quadrant outside 1..=4
    #[error("Invalid quadrant {0}: expected 1-4")]
    InvalidQuadrant(i64),

    /// Unknown event kind string
    #[error("Unknown event kind '{0}': expected 'habitual' or 'adHoc'")]
    UnknownKind(String),

    /// Malformed wall-clock time
    #[error("Invalid time '{0}': expected HH:MM")]
    InvalidWallClock(String),

    /// Required field left blank
    #[error("Field '{0}' must not be blank")]
    Blank(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
