//! Configuration error types

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid URL format
    #[error("Invalid URL for {field}: {url}")]
    InvalidUrl { field: String, url: String },

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Invalid range value
    #[error("Value {value} is out of range for {field} (expected {min}-{max})")]
    OutOfRange {
        field: String,
        value: u64,
        min: u64,
        max: u64,
    },

    /// Chunking hard ceiling does not sit above the soft target
    #[error("max_tokens ({max_tokens}) must be greater than token_target ({token_target})")]
    InvalidBudget {
        token_target: usize,
        max_tokens: usize,
    },

    /// Unknown value for an enumerated setting
    #[error("Invalid value '{value}' for {field}")]
    InvalidValue { field: String, value: String },

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    /// TOML rendering error
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error message
    #[error("Configuration error: {message}")]
    Generic { message: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
