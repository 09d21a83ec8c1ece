//! Heuristic grid adaptation for numerically difficult contracts.
//!
//! The thresholds are policy, not a guarantee: a contract classified as
//! ordinary may still produce a poor curve, and an adapted grid is not
//! proven to be better.

use pricer_models::instruments::ContractParams;
use pricer_models::models::HestonParams;
use tracing::debug;

use super::config::GridConfig;

/// Moneyness band considered ordinary.
const MONEYNESS_BAND: (f64, f64) = (0.5, 2.0);
/// Expiry below which high initial variance is challenging.
const SHORT_EXPIRY: f64 = 0.15;
/// Initial variance above which short expiries are challenging.
const HIGH_V0: f64 = 0.04;
/// Vol-of-vol above which a contract is challenging.
const HIGH_SIGMA: f64 = 1.0;
/// Absolute correlation above which a contract is challenging.
const HIGH_RHO: f64 = 0.9;

/// Classifies contracts and widens or narrows the FFT grid for them.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParameterAdapter;

impl ParameterAdapter {
    /// Whether the contract/model pair is numerically challenging.
    ///
    /// True when any of the following hold:
    /// - K/S outside [0.5, 2.0]
    /// - T < 0.15 with v0 > 0.04
    /// - σ > 1.0
    /// - |ρ| > 0.9
    pub fn is_challenging(contract: &ContractParams, params: &HestonParams) -> bool {
        let moneyness = contract.moneyness();
        moneyness < MONEYNESS_BAND.0
            || moneyness > MONEYNESS_BAND.1
            || (contract.expiry() < SHORT_EXPIRY && params.v0() > HIGH_V0)
            || params.sigma() > HIGH_SIGMA
            || params.rho().abs() > HIGH_RHO
    }

    /// Classifies the pair and, if challenging, adjusts `config` in place.
    ///
    /// Adjustments, applied in order:
    /// - K/S > 1.5 or < 0.7: N = 8192, range = 4.0
    /// - T < 0.1: η = 0.025, α = 1.25
    /// - T > 2.0: η = 0.1
    ///
    /// Returns the classification; `config` is untouched when it is
    /// `false`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_pricing::fft::{GridConfig, ParameterAdapter};
    /// use pricer_models::instruments::ContractParams;
    /// use pricer_models::models::HestonParams;
    ///
    /// let contract = ContractParams::new(100.0, 300.0, 0.02, 0.05, 0.02).unwrap();
    /// let params = HestonParams::new(0.04, 1.0, 0.04, 0.4, -0.7).unwrap();
    /// let mut config = GridConfig::default();
    ///
    /// assert!(ParameterAdapter::classify_and_adapt(&contract, &params, &mut config));
    /// assert_eq!(config.fft_size, 8192);
    /// assert_eq!(config.eta, 0.025);
    /// ```
    pub fn classify_and_adapt(
        contract: &ContractParams,
        params: &HestonParams,
        config: &mut GridConfig,
    ) -> bool {
        if !Self::is_challenging(contract, params) {
            return false;
        }

        let moneyness = contract.moneyness();
        let expiry = contract.expiry();
        if !(0.7..=1.5).contains(&moneyness) {
            config.fft_size = 8192;
            config.log_strike_range = 4.0;
        }
        if expiry < 0.1 {
            config.eta = 0.025;
            config.alpha = 1.25;
        } else if expiry > 2.0 {
            config.eta = 0.1;
        }

        debug!(
            moneyness,
            expiry,
            n = config.fft_size,
            eta = config.eta,
            alpha = config.alpha,
            range = config.log_strike_range,
            "challenging contract, grid adapted"
        );
        true
    }
}
