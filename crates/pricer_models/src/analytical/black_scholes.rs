//! Black-Scholes pricing model for European options with dividend yield.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·e^(−qT)·N(d₁) − K·e^(−rT)·N(d₂)
//! **Put Price**: P = K·e^(−rT)·N(−d₂) − S·e^(−qT)·N(−d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r − q + σ²/2)T) / (σ√T)
//! - d₂ = d₁ − σ√T

use super::distributions::norm_cdf;
use super::error::AnalyticalError;
use crate::instruments::{ContractParams, OptionType};

/// Expiries below this are priced at intrinsic value.
const EXPIRY_EPSILON: f64 = 1e-10;

/// Black-Scholes model for European option pricing.
///
/// # Examples
/// ```
/// use pricer_models::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0, 0.05, 0.02, 0.2).unwrap();
/// let call = bs.price_call(100.0, 1.0);
/// let put = bs.price_put(100.0, 1.0);
///
/// // Put-call parity: C − P = S·e^(−qT) − K·e^(−rT)
/// let parity = call - put - (100.0 * (-0.02_f64).exp() - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BlackScholes {
    spot: f64,
    rate: f64,
    dividend: f64,
    volatility: f64,
}

impl BlackScholes {
    /// Creates a new Black-Scholes model.
    ///
    /// # Errors
    /// - `AnalyticalError::InvalidSpot` if spot <= 0
    /// - `AnalyticalError::InvalidVolatility` if volatility <= 0 or not finite
    pub fn new(spot: f64, rate: f64, dividend: f64, volatility: f64) -> Result<Self, AnalyticalError> {
        if !spot.is_finite() || spot <= 0.0 {
            return Err(AnalyticalError::InvalidSpot { spot });
        }

        if !volatility.is_finite() || volatility <= 0.0 {
            return Err(AnalyticalError::InvalidVolatility { volatility });
        }

        Ok(Self {
            spot,
            rate,
            dividend,
            volatility,
        })
    }

    /// Model for the underlying of `contract` at the given volatility.
    pub fn for_contract(contract: &ContractParams, volatility: f64) -> Result<Self, AnalyticalError> {
        Self::new(contract.spot(), contract.rate(), contract.dividend(), volatility)
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Computes d₁ and d₂.
    #[inline]
    fn d1_d2(&self, strike: f64, expiry: f64) -> (f64, f64) {
        let vol_sqrt_t = self.volatility * expiry.sqrt();
        let drift = (self.rate - self.dividend + 0.5 * self.volatility * self.volatility) * expiry;
        let d1 = ((self.spot / strike).ln() + drift) / vol_sqrt_t;
        (d1, d1 - vol_sqrt_t)
    }

    /// Computes European call option price.
    pub fn price_call(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return (self.spot - strike).max(0.0);
        }

        let (d1, d2) = self.d1_d2(strike, expiry);
        let df_q = (-self.dividend * expiry).exp();
        let df_r = (-self.rate * expiry).exp();

        (self.spot * df_q * norm_cdf(d1) - strike * df_r * norm_cdf(d2)).max(0.0)
    }

    /// Computes European put option price.
    pub fn price_put(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return (strike - self.spot).max(0.0);
        }

        let (d1, d2) = self.d1_d2(strike, expiry);
        let df_q = (-self.dividend * expiry).exp();
        let df_r = (-self.rate * expiry).exp();

        (strike * df_r * norm_cdf(-d2) - self.spot * df_q * norm_cdf(-d1)).max(0.0)
    }

    /// Prices `contract` as a call or put.
    pub fn price(&self, contract: &ContractParams, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => self.price_call(contract.strike(), contract.expiry()),
            OptionType::Put => self.price_put(contract.strike(), contract.expiry()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_rejects_invalid_inputs() {
        assert!(matches!(
            BlackScholes::new(0.0, 0.05, 0.0, 0.2),
            Err(AnalyticalError::InvalidSpot { .. })
        ));
        assert!(matches!(
            BlackScholes::new(100.0, 0.05, 0.0, 0.0),
            Err(AnalyticalError::InvalidVolatility { .. })
        ));
        assert!(matches!(
            BlackScholes::new(100.0, 0.05, 0.0, f64::NAN),
            Err(AnalyticalError::InvalidVolatility { .. })
        ));
    }

    #[test]
    fn test_reference_call_price() {
        // Hull, S=42, K=40, r=10%, σ=20%, T=0.5 → C ≈ 4.76
        let bs = BlackScholes::new(42.0, 0.1, 0.0, 0.2).unwrap();
        assert_abs_diff_eq!(bs.price_call(40.0, 0.5), 4.759, epsilon = 1e-3);
        assert_abs_diff_eq!(bs.price_put(40.0, 0.5), 0.808, epsilon = 1e-3);
    }

    #[test]
    fn test_put_call_parity_with_dividend() {
        let bs = BlackScholes::new(100.0, 0.05, 0.02, 0.25).unwrap();
        for &k in &[80.0, 95.0, 100.0, 120.0] {
            let lhs = bs.price_call(k, 0.75) - bs.price_put(k, 0.75);
            let rhs = 100.0 * (-0.02_f64 * 0.75).exp() - k * (-0.05_f64 * 0.75).exp();
            assert_abs_diff_eq!(lhs, rhs, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_call_increasing_in_volatility() {
        let mut prev = 0.0;
        for i in 1..=20 {
            let bs = BlackScholes::new(100.0, 0.05, 0.02, 0.05 * i as f64).unwrap();
            let price = bs.price_call(110.0, 0.25);
            assert!(price > prev);
            prev = price;
        }
    }

    #[test]
    fn test_zero_expiry_is_intrinsic() {
        let bs = BlackScholes::new(100.0, 0.05, 0.0, 0.2).unwrap();
        assert_relative_eq!(bs.price_call(90.0, 0.0), 10.0);
        assert_relative_eq!(bs.price_put(90.0, 0.0), 0.0);
    }

    #[test]
    fn test_price_dispatch() {
        let contract = ContractParams::new(100.0, 105.0, 0.5, 0.03, 0.01).unwrap();
        let bs = BlackScholes::for_contract(&contract, 0.3).unwrap();
        assert_eq!(
            bs.price(&contract, OptionType::Call),
            bs.price_call(105.0, 0.5)
        );
        assert_eq!(bs.price(&contract, OptionType::Put), bs.price_put(105.0, 0.5));
    }
}
