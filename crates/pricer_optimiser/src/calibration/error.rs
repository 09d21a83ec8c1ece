//! Calibration error types.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Errors raised while setting up a calibration.
///
/// Poor fits and out-of-bounds results are not errors: they are reported
/// through [`FallbackReason`](super::FallbackReason).
///
/// # Examples
///
/// ```
/// use pricer_optimiser::calibration::CalibrationError;
///
/// let err = CalibrationError::EmptyGrid { name: "rho_values" };
/// assert!(format!("{}", err).contains("rho_values"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// A candidate grid has no values.
    #[error("Candidate grid '{name}' is empty")]
    EmptyGrid {
        /// Grid name
        name: &'static str,
    },

    /// A threshold or ratio is not finite and positive.
    #[error("Invalid threshold '{name}': {value} (must be finite and > 0)")]
    InvalidThreshold {
        /// Threshold name
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Lower volatility bound is not below the upper bound.
    #[error("Invalid volatility bounds [{lower}, {upper}]")]
    InvalidBounds {
        /// Lower bound
        lower: f64,
        /// Upper bound
        upper: f64,
    },

    /// A grid value cannot produce valid Heston parameters.
    #[error("Invalid value {value} in candidate grid '{name}'")]
    InvalidGridValue {
        /// Grid name
        name: &'static str,
        /// Rejected value
        value: f64,
    },
}

impl From<CalibrationError> for PricingError {
    fn from(err: CalibrationError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}
