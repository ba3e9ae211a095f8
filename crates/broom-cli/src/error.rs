//! Error types for the CLI application.

use broom_sweeper::SweepError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No configuration file could be found
    #[error("Config file not found: {}", path.display())]
    ConfigNotFound {
        /// The explicit path, or the first default location
        path: PathBuf,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file could not be read
    #[error("Cannot read config file {}: {error}", path.display())]
    ConfigRead {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        error: std::io::Error,
    },

    /// The config file is not valid TOML
    #[error("Cannot parse config file {}: {error}", path.display())]
    Toml {
        /// Config file path
        path: PathBuf,
        /// Underlying TOML error
        error: toml::de::Error,
    },

    /// Sweep error
    #[error(transparent)]
    Sweep(#[from] SweepError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Logging could not be installed
    #[error("Logging error: {0}")]
    Logging(String),
}
