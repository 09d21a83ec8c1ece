//! Error types for analytical pricing operations.

use pricer_core::types::PricingError;
use thiserror::Error;

/// Analytical pricing errors.
///
/// # Variants
/// - `InvalidVolatility`: Non-positive volatility
/// - `InvalidSpot`: Non-positive spot price
/// - `InvalidPrice`: Non-positive or non-finite option price
/// - `BelowIntrinsic`: Market price under the no-arbitrage lower bound
/// - `PriceOutOfRange`: Market price not attainable inside the volatility bracket
/// - `NumericalInstability`: Computation encountered numerical issues
///
/// # Examples
/// ```
/// use pricer_models::analytical::AnalyticalError;
///
/// let err = AnalyticalError::InvalidVolatility { volatility: -0.2 };
/// assert!(format!("{}", err).contains("volatility"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalyticalError {
    /// Invalid volatility (non-positive).
    #[error("Invalid volatility: σ = {volatility}")]
    InvalidVolatility {
        /// The invalid volatility value
        volatility: f64,
    },

    /// Invalid spot price (non-positive).
    #[error("Invalid spot price: S = {spot}")]
    InvalidSpot {
        /// The invalid spot price value
        spot: f64,
    },

    /// Invalid option price.
    #[error("Invalid option price: {price}")]
    InvalidPrice {
        /// The invalid price
        price: f64,
    },

    /// Market price below the discounted intrinsic value.
    #[error("Price {price} below intrinsic value {intrinsic}")]
    BelowIntrinsic {
        /// Market price
        price: f64,
        /// S·e^(−qT) − K·e^(−rT)
        intrinsic: f64,
    },

    /// Market price outside the prices reachable in the volatility bracket.
    #[error("Price {price} outside attainable range [{min}, {max}]")]
    PriceOutOfRange {
        /// Market price
        price: f64,
        /// Price at the lowest volatility
        min: f64,
        /// Price at the highest volatility
        max: f64,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {message}")]
    NumericalInstability {
        /// Description of the numerical issue
        message: String,
    },
}

impl From<AnalyticalError> for PricingError {
    fn from(err: AnalyticalError) -> Self {
        match err {
            AnalyticalError::InvalidVolatility { .. }
            | AnalyticalError::InvalidSpot { .. }
            | AnalyticalError::InvalidPrice { .. } => PricingError::InvalidInput(err.to_string()),
            AnalyticalError::PriceOutOfRange { .. } => PricingError::BoundsViolation(err.to_string()),
            AnalyticalError::BelowIntrinsic { .. } | AnalyticalError::NumericalInstability { .. } => {
                PricingError::ModelFailure(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = AnalyticalError::BelowIntrinsic {
            price: 1.0,
            intrinsic: 2.5,
        };
        assert_eq!(format!("{}", err), "Price 1 below intrinsic value 2.5");

        let err = AnalyticalError::PriceOutOfRange {
            price: 90.0,
            min: 0.0,
            max: 60.0,
        };
        assert!(format!("{}", err).contains("[0, 60]"));
    }

    #[test]
    fn test_input_errors_map_to_invalid_input() {
        let err: PricingError = AnalyticalError::InvalidPrice { price: -1.0 }.into();
        assert!(matches!(err, PricingError::InvalidInput(_)));
    }

    #[test]
    fn test_inversion_failures_are_not_recoverable() {
        let err: PricingError = AnalyticalError::PriceOutOfRange {
            price: 90.0,
            min: 0.0,
            max: 60.0,
        }
        .into();
        assert!(matches!(err, PricingError::BoundsViolation(_)));
        assert!(!err.is_recoverable());

        let err: PricingError = AnalyticalError::BelowIntrinsic {
            price: 1.0,
            intrinsic: 2.5,
        }
        .into();
        assert!(matches!(err, PricingError::ModelFailure(_)));
        assert!(!err.is_recoverable());
    }
}
