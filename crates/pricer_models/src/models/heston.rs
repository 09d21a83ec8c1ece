//! Heston stochastic volatility model.
//!
//! The Heston model is described by the SDEs:
//! ```text
//! dS = (r - q) * S * dt + sqrt(V) * S * dW_S
//! dV = kappa * (theta - V) * dt + sigma * sqrt(V) * dW_V
//! E[dW_S * dW_V] = rho * dt
//! ```
//!
//! ## Characteristic Function
//!
//! For a complex argument u, with b = κ − ρσ·iu:
//! ```text
//! d = sqrt((ρσ·iu − κ)² − σ²·(iu)·(iu − i))
//! g = (b − d) / (b + d)
//! A = (r − q)·iu·T + κθ/σ² · [(b − d)T − 2 ln((1 − g e^(−dT)) / (1 − g))]
//! B = (b − d)/σ² · (1 − e^(−dT)) / (1 − g e^(−dT))
//! φ(u) = exp(A + B·v0 + iu·ln S)
//! ```
//!
//! ## Example
//!
//! ```
//! use num_complex::Complex64;
//! use pricer_models::instruments::ContractParams;
//! use pricer_models::models::heston::{HestonCharacteristicFunction, HestonParams};
//!
//! let params = HestonParams::new(0.04, 1.5, 0.04, 0.3, -0.7).unwrap();
//! let contract = ContractParams::new(100.0, 100.0, 1.0, 0.05, 0.0).unwrap();
//! let cf = HestonCharacteristicFunction::new(&params, &contract);
//!
//! // φ(0) = 1 for any probability measure
//! let phi = cf.evaluate(Complex64::new(0.0, 0.0));
//! assert!((phi - Complex64::new(1.0, 0.0)).norm() < 1e-12);
//! ```

use num_complex::Complex64;
use pricer_core::types::PricingError;
use thiserror::Error;
use tracing::trace;

use crate::instruments::ContractParams;

/// Heston parameter validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HestonError {
    /// Initial variance is negative.
    #[error("Invalid initial variance: v0 = {0} (must be >= 0)")]
    InvalidV0(f64),

    /// Mean-reversion speed is not positive.
    #[error("Invalid mean reversion speed: kappa = {0} (must be > 0)")]
    InvalidKappa(f64),

    /// Long-run variance is negative.
    #[error("Invalid long-run variance: theta = {0} (must be >= 0)")]
    InvalidTheta(f64),

    /// Vol-of-vol is negative.
    #[error("Invalid vol-of-vol: sigma = {0} (must be >= 0)")]
    InvalidSigma(f64),

    /// Correlation outside [-1, 1].
    #[error("Invalid correlation: rho = {0} (must be in [-1, 1])")]
    InvalidRho(f64),
}

impl From<HestonError> for PricingError {
    fn from(err: HestonError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

/// Heston model parameters.
///
/// Candidate sets are created and discarded by calibration; a value is
/// never mutated after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HestonParams {
    v0: f64,
    kappa: f64,
    theta: f64,
    sigma: f64,
    rho: f64,
}

impl HestonParams {
    /// Creates validated Heston parameters.
    ///
    /// # Arguments
    /// * `v0` - Initial variance (>= 0)
    /// * `kappa` - Mean reversion speed (> 0)
    /// * `theta` - Long-run variance (>= 0)
    /// * `sigma` - Volatility of variance (>= 0)
    /// * `rho` - Spot/variance correlation in [-1, 1]
    pub fn new(v0: f64, kappa: f64, theta: f64, sigma: f64, rho: f64) -> Result<Self, HestonError> {
        if !v0.is_finite() || v0 < 0.0 {
            return Err(HestonError::InvalidV0(v0));
        }
        if !kappa.is_finite() || kappa <= 0.0 {
            return Err(HestonError::InvalidKappa(kappa));
        }
        if !theta.is_finite() || theta < 0.0 {
            return Err(HestonError::InvalidTheta(theta));
        }
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(HestonError::InvalidSigma(sigma));
        }
        if !rho.is_finite() || !(-1.0..=1.0).contains(&rho) {
            return Err(HestonError::InvalidRho(rho));
        }

        Ok(Self {
            v0,
            kappa,
            theta,
            sigma,
            rho,
        })
    }

    /// Initial variance.
    #[inline]
    pub fn v0(&self) -> f64 {
        self.v0
    }

    /// Mean reversion speed.
    #[inline]
    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    /// Long-run variance.
    #[inline]
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Volatility of variance.
    #[inline]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Spot/variance correlation.
    #[inline]
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Volatility implied by the initial variance, √v0.
    #[inline]
    pub fn initial_vol(&self) -> f64 {
        self.v0.sqrt()
    }
}

/// Heston characteristic function bound to one contract.
///
/// Evaluation never yields NaN or infinity from the `g`, `A`, `B` terms:
/// when any of them is non-finite the neutral value `1 + 0i` is returned
/// instead and the substitution is reported at trace level.
#[derive(Debug, Clone, Copy)]
pub struct HestonCharacteristicFunction {
    params: HestonParams,
    log_spot: f64,
    carry: f64,
    expiry: f64,
}

impl HestonCharacteristicFunction {
    /// Binds `params` to the underlying and expiry of `contract`.
    pub fn new(params: &HestonParams, contract: &ContractParams) -> Self {
        Self {
            params: *params,
            log_spot: contract.spot().ln(),
            carry: contract.rate() - contract.dividend(),
            expiry: contract.expiry(),
        }
    }

    /// The bound model parameters.
    #[inline]
    pub fn params(&self) -> &HestonParams {
        &self.params
    }

    /// φ(u), or `None` if `g`, `A` or `B` is not finite.
    pub fn try_evaluate(&self, u: Complex64) -> Option<Complex64> {
        let HestonParams {
            v0,
            kappa,
            theta,
            sigma,
            rho,
        } = self.params;
        let t = self.expiry;
        let i = Complex64::i();
        let one = Complex64::new(1.0, 0.0);

        let iu = i * u;
        let sigma2 = sigma * sigma;

        let rho_sigma_iu = rho * sigma * iu;
        let d = ((rho_sigma_iu - kappa).powu(2) - sigma2 * iu * (iu - i)).sqrt();
        let b_minus_d = kappa - rho_sigma_iu - d;
        let g = b_minus_d / (kappa - rho_sigma_iu + d);
        if !is_finite(g) {
            return None;
        }

        let exp_dt = (-d * t).exp();
        let a = self.carry * iu * t
            + kappa * theta / sigma2 * (b_minus_d * t - 2.0 * ((one - g * exp_dt) / (one - g)).ln());
        let b = b_minus_d * (one - exp_dt) / (sigma2 * (one - g * exp_dt));
        if !is_finite(a) || !is_finite(b) {
            return None;
        }

        Some((a + b * v0 + iu * self.log_spot).exp())
    }

    /// φ(u) with non-finite intermediate terms replaced by `1 + 0i`.
    pub fn evaluate(&self, u: Complex64) -> Complex64 {
        self.try_evaluate(u).unwrap_or_else(|| {
            trace!(re = u.re, im = u.im, "non-finite Heston term, substituting 1+0i");
            Complex64::new(1.0, 0.0)
        })
    }
}

#[inline]
fn is_finite(z: Complex64) -> bool {
    z.re.is_finite() && z.im.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn contract() -> ContractParams {
        ContractParams::new(100.0, 100.0, 0.5, 0.03, 0.01).unwrap()
    }

    fn params() -> HestonParams {
        HestonParams::new(0.04, 1.5, 0.05, 0.4, -0.6).unwrap()
    }

    #[test]
    fn test_validation() {
        assert!(HestonParams::new(0.0, 1.0, 0.0, 0.0, 0.0).is_ok());
        assert_eq!(
            HestonParams::new(-0.01, 1.0, 0.04, 0.3, 0.0),
            Err(HestonError::InvalidV0(-0.01))
        );
        assert_eq!(
            HestonParams::new(0.04, 0.0, 0.04, 0.3, 0.0),
            Err(HestonError::InvalidKappa(0.0))
        );
        assert_eq!(
            HestonParams::new(0.04, 1.0, -0.04, 0.3, 0.0),
            Err(HestonError::InvalidTheta(-0.04))
        );
        assert_eq!(
            HestonParams::new(0.04, 1.0, 0.04, -0.3, 0.0),
            Err(HestonError::InvalidSigma(-0.3))
        );
        assert_eq!(
            HestonParams::new(0.04, 1.0, 0.04, 0.3, 1.5),
            Err(HestonError::InvalidRho(1.5))
        );
        assert!(HestonParams::new(f64::NAN, 1.0, 0.04, 0.3, 0.0).is_err());
    }

    #[test]
    fn test_cf_at_zero_is_one() {
        let cf = HestonCharacteristicFunction::new(&params(), &contract());
        let phi = cf.evaluate(Complex64::new(0.0, 0.0));
        assert_abs_diff_eq!(phi.re, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(phi.im, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cf_finite_along_damped_contour() {
        // Arguments used by the Carr-Madan transform: v − (α + 1)i
        let cf = HestonCharacteristicFunction::new(&params(), &contract());
        for k in 0..400 {
            let u = Complex64::new(k as f64 * 0.05, -2.5);
            let phi = cf.evaluate(u);
            assert!(phi.re.is_finite() && phi.im.is_finite(), "φ({}) not finite", u);
        }
    }

    #[test]
    fn test_cf_depends_on_initial_variance() {
        let c = contract();
        let low = HestonCharacteristicFunction::new(
            &HestonParams::new(0.01, 1.5, 0.05, 0.4, -0.6).unwrap(),
            &c,
        );
        let high = HestonCharacteristicFunction::new(
            &HestonParams::new(0.09, 1.5, 0.05, 0.4, -0.6).unwrap(),
            &c,
        );
        let u = Complex64::new(1.0, -2.5);
        assert!((low.evaluate(u) - high.evaluate(u)).norm() > 1e-6);
    }

    #[test]
    fn test_zero_vol_of_vol_is_substituted() {
        let p = HestonParams::new(0.04, 1.0, 0.04, 0.0, 0.0).unwrap();
        let cf = HestonCharacteristicFunction::new(&p, &contract());
        let u = Complex64::new(2.0, 0.0);
        assert!(cf.try_evaluate(u).is_none());
        assert_eq!(cf.evaluate(u), Complex64::new(1.0, 0.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn admissible_params_are_accepted(
                v0 in 0.0f64..2.0,
                kappa in 1e-6f64..20.0,
                theta in 0.0f64..2.0,
                sigma in 0.0f64..3.0,
                rho in -1.0f64..=1.0,
            ) {
                let p = HestonParams::new(v0, kappa, theta, sigma, rho).unwrap();
                prop_assert_eq!(p.v0(), v0);
                prop_assert_eq!(p.rho(), rho);
                prop_assert!((p.initial_vol() * p.initial_vol() - v0).abs() < 1e-12);
            }

            #[test]
            fn correlation_outside_unit_interval_is_rejected(
                excess in 1e-9f64..10.0,
                negative in any::<bool>(),
            ) {
                let rho = if negative { -1.0 - excess } else { 1.0 + excess };
                prop_assert_eq!(
                    HestonParams::new(0.04, 1.5, 0.04, 0.3, rho),
                    Err(HestonError::InvalidRho(rho))
                );
            }

            #[test]
            fn non_positive_mean_reversion_is_rejected(kappa in -10.0f64..=0.0) {
                prop_assert_eq!(
                    HestonParams::new(0.04, kappa, 0.04, 0.3, -0.5),
                    Err(HestonError::InvalidKappa(kappa))
                );
            }

            #[test]
            fn negative_variances_are_rejected(v in -10.0f64..-1e-12) {
                prop_assert_eq!(
                    HestonParams::new(v, 1.5, 0.04, 0.3, 0.0),
                    Err(HestonError::InvalidV0(v))
                );
                prop_assert_eq!(
                    HestonParams::new(0.04, 1.5, v, 0.3, 0.0),
                    Err(HestonError::InvalidTheta(v))
                );
            }
        }
    }
}
