//! Error types for Pixie3D

use thiserror::Error;

/// Main error type for Pixie3D
#[derive(Error, Debug)]
pub enum Pixie3dError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for Pixie3D operations
pub type Result<T> = std::result::Result<T, Pixie3dError>;
