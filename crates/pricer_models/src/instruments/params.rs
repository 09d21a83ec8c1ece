//! European option contract parameters.

use super::error::InstrumentError;

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// Right to buy at the strike.
    #[default]
    Call,
    /// Right to sell at the strike.
    Put,
}

/// Terms of a European option on a dividend-paying underlying.
///
/// Immutable once constructed; every field has been checked for
/// positivity (spot, strike, expiry) and finiteness (all five).
///
/// # Examples
/// ```
/// use pricer_models::instruments::ContractParams;
///
/// let contract = ContractParams::new(100.0, 110.0, 0.5, 0.05, 0.02).unwrap();
/// assert_eq!(contract.strike(), 110.0);
/// assert!((contract.moneyness() - 1.1).abs() < 1e-12);
///
/// // Non-positive expiry is rejected
/// assert!(ContractParams::new(100.0, 110.0, 0.0, 0.05, 0.02).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContractParams {
    spot: f64,
    strike: f64,
    expiry: f64,
    rate: f64,
    dividend: f64,
}

impl ContractParams {
    /// Creates contract parameters with validation.
    ///
    /// # Arguments
    /// * `spot` - Underlying price S (must be positive)
    /// * `strike` - Strike K (must be positive)
    /// * `expiry` - Time to expiry T in years (must be positive)
    /// * `rate` - Continuously compounded risk-free rate r (any sign)
    /// * `dividend` - Continuous dividend yield q (any sign)
    pub fn new(
        spot: f64,
        strike: f64,
        expiry: f64,
        rate: f64,
        dividend: f64,
    ) -> Result<Self, InstrumentError> {
        for (name, value) in [
            ("spot", spot),
            ("strike", strike),
            ("expiry", expiry),
            ("rate", rate),
            ("dividend", dividend),
        ] {
            if !value.is_finite() {
                return Err(InstrumentError::NonFinite { name, value });
            }
        }

        if spot <= 0.0 {
            return Err(InstrumentError::InvalidSpot { spot });
        }
        if strike <= 0.0 {
            return Err(InstrumentError::InvalidStrike { strike });
        }
        if expiry <= 0.0 {
            return Err(InstrumentError::InvalidExpiry { expiry });
        }

        Ok(Self {
            spot,
            strike,
            expiry,
            rate,
            dividend,
        })
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the strike.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Returns the time to expiry in years.
    #[inline]
    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the dividend yield.
    #[inline]
    pub fn dividend(&self) -> f64 {
        self.dividend
    }

    /// Strike over spot, K/S.
    #[inline]
    pub fn moneyness(&self) -> f64 {
        self.strike / self.spot
    }

    /// Forward price F = S·e^((r−q)T).
    #[inline]
    pub fn forward(&self) -> f64 {
        self.spot * ((self.rate - self.dividend) * self.expiry).exp()
    }

    /// Risk-free discount factor e^(−rT).
    #[inline]
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.expiry).exp()
    }

    /// Dividend discount factor e^(−qT).
    #[inline]
    pub fn dividend_factor(&self) -> f64 {
        (-self.dividend * self.expiry).exp()
    }

    /// Lower no-arbitrage bound for a call: S·e^(−qT) − K·e^(−rT).
    #[inline]
    pub fn call_intrinsic(&self) -> f64 {
        self.spot * self.dividend_factor() - self.strike * self.discount_factor()
    }

    /// Same contract with a different strike.
    pub fn with_strike(&self, strike: f64) -> Result<Self, InstrumentError> {
        Self::new(self.spot, strike, self.expiry, self.rate, self.dividend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_valid_contract() {
        let c = ContractParams::new(100.0, 95.0, 0.25, 0.05, 0.02).unwrap();
        assert_eq!(c.spot(), 100.0);
        assert_eq!(c.strike(), 95.0);
        assert_eq!(c.expiry(), 0.25);
        assert_eq!(c.rate(), 0.05);
        assert_eq!(c.dividend(), 0.02);
    }

    #[test]
    fn test_negative_rates_allowed() {
        assert!(ContractParams::new(100.0, 100.0, 1.0, -0.01, -0.005).is_ok());
    }

    #[test]
    fn test_rejects_non_positive_terms() {
        assert_eq!(
            ContractParams::new(0.0, 100.0, 1.0, 0.0, 0.0),
            Err(InstrumentError::InvalidSpot { spot: 0.0 })
        );
        assert_eq!(
            ContractParams::new(100.0, -5.0, 1.0, 0.0, 0.0),
            Err(InstrumentError::InvalidStrike { strike: -5.0 })
        );
        assert_eq!(
            ContractParams::new(100.0, 100.0, -1.0, 0.0, 0.0),
            Err(InstrumentError::InvalidExpiry { expiry: -1.0 })
        );
    }

    #[test]
    fn test_rejects_non_finite() {
        let result = ContractParams::new(100.0, 100.0, 1.0, f64::NAN, 0.0);
        assert!(matches!(
            result,
            Err(InstrumentError::NonFinite { name: "rate", .. })
        ));
    }

    #[test]
    fn test_forward_and_discounting() {
        let c = ContractParams::new(100.0, 100.0, 2.0, 0.05, 0.02).unwrap();
        assert_relative_eq!(c.forward(), 100.0 * (0.06_f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(c.discount_factor(), (-0.1_f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(c.dividend_factor(), (-0.04_f64).exp(), epsilon = 1e-12);
        assert_relative_eq!(
            c.call_intrinsic(),
            100.0 * (-0.04_f64).exp() - 100.0 * (-0.1_f64).exp(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_with_strike() {
        let c = ContractParams::new(100.0, 100.0, 1.0, 0.0, 0.0).unwrap();
        let d = c.with_strike(120.0).unwrap();
        assert_eq!(d.strike(), 120.0);
        assert_eq!(d.spot(), 100.0);
        assert!(c.with_strike(0.0).is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn positive_terms_are_accepted(
                spot in 1e-3f64..1e4,
                strike in 1e-3f64..1e4,
                expiry in 1e-4f64..30.0,
                rate in -0.1f64..0.2,
                dividend in -0.1f64..0.2,
            ) {
                let c = ContractParams::new(spot, strike, expiry, rate, dividend).unwrap();
                prop_assert!((c.moneyness() - strike / spot).abs() <= 1e-12 * c.moneyness());
                prop_assert!(c.discount_factor() > 0.0);
            }

            #[test]
            fn non_positive_spot_is_rejected(spot in -1e4f64..=0.0) {
                prop_assert_eq!(
                    ContractParams::new(spot, 100.0, 1.0, 0.05, 0.0),
                    Err(InstrumentError::InvalidSpot { spot })
                );
            }

            #[test]
            fn non_positive_strike_is_rejected(strike in -1e4f64..=0.0) {
                prop_assert_eq!(
                    ContractParams::new(100.0, strike, 1.0, 0.05, 0.0),
                    Err(InstrumentError::InvalidStrike { strike })
                );
            }

            #[test]
            fn non_positive_expiry_is_rejected(expiry in -30.0f64..=0.0) {
                prop_assert_eq!(
                    ContractParams::new(100.0, 100.0, expiry, 0.05, 0.0),
                    Err(InstrumentError::InvalidExpiry { expiry })
                );
            }
        }
    }
}
