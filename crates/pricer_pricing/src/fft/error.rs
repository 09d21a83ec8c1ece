//! Error types for FFT grid configuration.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Grid configuration error.
///
/// Raised by [`GridConfig::validate`](super::GridConfig::validate) when an
/// override is out of range. Values are never clamped into range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// FFT length is not a power of two within the supported range.
    #[error("Invalid FFT size {0}: must be a power of two in [{min}, {max}]", min = super::config::MIN_FFT_SIZE, max = super::config::MAX_FFT_SIZE)]
    InvalidFftSize(usize),

    /// A real-valued parameter is zero, negative or not finite.
    #[error("Invalid parameter '{name}': {value} (must be finite and > 0)")]
    NonPositive {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
}

impl From<ConfigError> for PricingError {
    fn from(err: ConfigError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}
