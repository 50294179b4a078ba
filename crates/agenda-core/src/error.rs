//! Core error types for agenda-core.
//!
//! Resolution itself never fails: malformed schedule data degrades to the
//! safest status. The types here cover the fallible edges of the library:
//! configuration I/O, schedule validation reports and the display sync channel.

use std::path::PathBuf;
use thiserror::Error;

use crate::runtime::RuntimeError;
use crate::sync::SyncError;

/// Core error type for agenda-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Cross-display sync errors
    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    /// The display runner task is gone
    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

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

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Home/config directory could not be determined or created
    #[error("Configuration directory unavailable: {0}")]
    DirectoryUnavailable(String),
}

/// Problems found in configured schedule data.
///
/// These are reported by [`crate::Agenda::validate`]; the engine itself keeps
/// running on data that fails validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Item start time could not be parsed and was treated as 00:00
    #[error("{day}: item {index} has malformed start time '{time}'")]
    MalformedTime {
        day: String,
        index: usize,
        time: String,
    },

    /// Items are not sorted by start time
    #[error("{day}: item {index} starts before the item preceding it")]
    UnsortedItems { day: String, index: usize },

    /// Item starts before the previous item has ended
    #[error("{day}: item {index} starts before item {previous} ends")]
    OverlappingItems {
        day: String,
        index: usize,
        previous: usize,
    },

    /// Day dates must strictly increase in presentation order
    #[error("day '{day}' is not dated after '{previous}'")]
    NonIncreasingDates { day: String, previous: String },

    /// Two days share a name
    #[error("day '{0}' is configured more than once")]
    DuplicateDay(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
