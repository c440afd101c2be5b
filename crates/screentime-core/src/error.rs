//! Core error types for screentime-core.
//!
//! Domain operations are mostly total: unknown ids are no-ops, not failures.
//! The hierarchy below covers the single domain rejection (completing a task
//! twice) plus the edges of the library: configuration, snapshot storage and
//! input validation.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for screentime-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Completion was requested for a task that is already completed.
    #[error("Task '{id}' is already completed")]
    AlreadyCompleted { id: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Snapshot storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Snapshot storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read snapshot at {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },

    #[error("Failed to write snapshot to {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },

    #[error("Unsupported snapshot version {found} (supported: 1..={supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text value was blank
    #[error("'{field}' must not be empty")]
    Empty { field: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub fn empty(field: &str) -> Self {
        ValidationError::Empty {
            field: field.to_string(),
        }
    }

    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
