//! CLI error types.

use std::path::PathBuf;

use pricer_core::types::PricingError;
use thiserror::Error;

/// Errors surfaced by the `implied-vol` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this tool.
    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        /// File path.
        path: PathBuf,
        /// Underlying parse error.
        source: toml::de::Error,
    },

    /// An environment variable holds an unparseable value.
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },

    /// Pricing or calibration failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
