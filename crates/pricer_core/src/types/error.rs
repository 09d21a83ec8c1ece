//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: Errors from pricing, calibration and recovery
//! - `InterpolationError`: Errors from interpolation operations
//! - `SolverError`: Errors from root-finding solvers

use std::fmt;
use thiserror::Error;

/// Categorised pricing errors.
///
/// Every failure in the pricing stack is eventually expressed as one of
/// these variants. Only [`InvalidInput`](PricingError::InvalidInput) and a
/// failing terminal Black-Scholes fallback are meant to reach the caller;
/// the remaining variants are either retried or recorded as a degraded
/// result.
///
/// # Variants
/// - `InvalidInput`: Non-positive price, spot, strike or expiry; invalid grid overrides
/// - `NumericalInstability`: Non-finite values in the transform pipeline
/// - `AllocationFailure`: A transform, grid or cache buffer could not be reserved
/// - `CalibrationNonConvergence`: Best candidate still misses the acceptance threshold
/// - `BoundsViolation`: Implied volatility outside the solver bracket
/// - `ModelFailure`: Closed-form model could not produce a result
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::InvalidInput("Negative spot price".to_string());
/// assert_eq!(format!("{}", err), "Invalid input: Negative spot price");
/// assert!(!err.is_recoverable());
///
/// let err = PricingError::NumericalInstability("NaN in FFT output".to_string());
/// assert!(err.is_recoverable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Invalid input data or parameters
    InvalidInput(String),

    /// Numerical instability during computation
    NumericalInstability(String),

    /// Buffer allocation failed
    AllocationFailure {
        /// Name of the buffer being reserved
        buffer: &'static str,
        /// Requested number of elements
        len: usize,
    },

    /// Calibration did not reach the acceptance threshold
    CalibrationNonConvergence(String),

    /// Result outside the accepted bounds
    BoundsViolation(String),

    /// Model failed to produce valid result
    ModelFailure(String),
}

impl PricingError {
    /// Returns `true` when a retry with a different grid configuration may succeed.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PricingError::NumericalInstability(_) | PricingError::AllocationFailure { .. }
        )
    }
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            PricingError::NumericalInstability(msg) => {
                write!(f, "Numerical instability: {}", msg)
            }
            PricingError::AllocationFailure { buffer, len } => {
                write!(f, "Allocation failure: {} ({} elements)", buffer, len)
            }
            PricingError::CalibrationNonConvergence(msg) => {
                write!(f, "Calibration did not converge: {}", msg)
            }
            PricingError::BoundsViolation(msg) => write!(f, "Bounds violation: {}", msg),
            PricingError::ModelFailure(msg) => write!(f, "Model failure: {}", msg),
        }
    }
}

impl std::error::Error for PricingError {}

/// Interpolation-related errors.
///
/// # Variants
/// - `InsufficientData`: Not enough data points for interpolation
/// - `NonFiniteValue`: A bracketing value is NaN or infinite
/// - `InvalidInput`: General invalid input error
///
/// # Examples
/// ```
/// use pricer_core::types::InterpolationError;
///
/// let err = InterpolationError::NonFiniteValue { index: 3 };
/// assert!(format!("{}", err).contains("index 3"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterpolationError {
    /// Insufficient data points for interpolation.
    #[error("Insufficient data points: got {got}, need at least {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },

    /// A bracketing value is not finite.
    #[error("Non-finite value at index {index}")]
    NonFiniteValue {
        /// Index of the offending value
        index: usize,
    },

    /// Invalid input data or parameters.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Root-finding solver errors.
///
/// # Variants
/// - `MaxIterationsExceeded`: Solver failed to converge within iteration limit
/// - `NoBracket`: Function values at bracket endpoints have same sign
/// - `NumericalInstability`: General numerical instability
///
/// # Examples
/// ```
/// use pricer_core::types::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 100 };
/// assert!(format!("{}", err).contains("100 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// No valid bracket (function values at endpoints have same sign).
    #[error("No bracket: f({a}) and f({b}) have same sign")]
    NoBracket {
        /// Left bracket endpoint
        a: f64,
        /// Right bracket endpoint
        b: f64,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}

impl From<InterpolationError> for PricingError {
    fn from(err: InterpolationError) -> Self {
        match err {
            InterpolationError::NonFiniteValue { .. } => {
                PricingError::NumericalInstability(err.to_string())
            }
            _ => PricingError::InvalidInput(err.to_string()),
        }
    }
}

impl From<SolverError> for PricingError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::NoBracket { .. } => PricingError::InvalidInput(err.to_string()),
            _ => PricingError::ModelFailure(err.to_string()),
        }
    }
}
