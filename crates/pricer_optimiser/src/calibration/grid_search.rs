//! Bounded grid search over Heston parameters.
//!
//! ## Algorithm
//!
//! 1. Invert the market price with Black-Scholes to obtain the anchor σ_BS
//! 2. Derive an initial (v0, κ) from forward moneyness and expiry
//! 3. Walk the candidate grid (v0 outermost, ρ innermost, θ = v0),
//!    tracking the smallest |price − market|
//! 4. Short-circuit to σ_BS if the first candidate already matches; stop
//!    early once a candidate is within the early-exit ratio
//! 5. Blend √v0* with σ_BS if the best fit is poor; prefer σ_BS if the
//!    estimate leaves the accepted bounds
//!
//! Candidates whose price came from the Black-Scholes fallback rather than
//! the FFT carry no Heston information: they are counted and skipped. If no
//! candidate was priced by the FFT the result is σ_BS, recorded as
//! [`FallbackReason::FourierUnavailable`].

use pricer_core::types::PricingError;
use pricer_models::analytical::ImpliedVolSolver;
use pricer_models::instruments::ContractParams;
use pricer_models::models::HestonParams;
use pricer_pricing::context::{PriceSource, PricingSession, Quote};
use pricer_pricing::fft::FftEngine;
use tracing::{debug, trace, warn};

use super::config::CalibratorConfig;
use super::result::{CalibrationResult, FallbackReason};

/// Source of model prices for candidate parameter sets.
pub trait CandidatePricer {
    /// Call quote of `contract` under `params`.
    ///
    /// The quote's [`PriceSource`] tells the search whether the price is a
    /// Heston price or a Black-Scholes stand-in.
    ///
    /// # Errors
    ///
    /// Any pricing error; every error aborts the search.
    fn price(&mut self, contract: &ContractParams, params: &HestonParams)
        -> Result<Quote, PricingError>;
}

impl<E: FftEngine> CandidatePricer for PricingSession<E> {
    fn price(
        &mut self,
        contract: &ContractParams,
        params: &HestonParams,
    ) -> Result<Quote, PricingError> {
        self.heston_call_price(contract, params)
    }
}

/// Starting point of the search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialGuess {
    /// Initial variance.
    pub v0: f64,
    /// Mean reversion speed.
    pub kappa: f64,
    /// Long-run variance suggested by moneyness.
    pub theta: f64,
}

impl InitialGuess {
    /// Guess from forward moneyness F/K and expiry, given σ_BS.
    ///
    /// | F/K        | v0          | κ   | θ           |
    /// |------------|-------------|-----|-------------|
    /// | > 1.1      | 1.1·σ_BS²   | 2.0 | 1.05·σ_BS²  |
    /// | < 0.9      | 1.05·σ_BS²  | 1.5 | σ_BS²       |
    /// | otherwise  | σ_BS²       | 1.0 | σ_BS²       |
    ///
    /// κ is then overridden to 3.0 for T < 0.1 and to 0.5 for T > 1.
    pub fn from_anchor(contract: &ContractParams, bs_vol: f64) -> Self {
        let variance = bs_vol * bs_vol;
        let forward_moneyness = contract.forward() / contract.strike();

        let (v0, mut kappa, theta) = if forward_moneyness > 1.1 {
            (1.1 * variance, 2.0, 1.05 * variance)
        } else if forward_moneyness < 0.9 {
            (1.05 * variance, 1.5, variance)
        } else {
            (variance, 1.0, variance)
        };

        let expiry = contract.expiry();
        if expiry < 0.1 {
            kappa = 3.0;
        } else if expiry > 1.0 {
            kappa = 0.5;
        }

        Self { v0, kappa, theta }
    }
}

/// Heston grid-search calibrator.
///
/// # Examples
///
/// ```
/// use pricer_core::types::PricingError;
/// use pricer_models::instruments::ContractParams;
/// use pricer_models::models::HestonParams;
/// use pricer_optimiser::calibration::{Calibrator, CandidatePricer, FallbackReason};
/// use pricer_pricing::context::{PriceSource, Quote};
///
/// /// Pricer that always reproduces the market.
/// struct Exact(f64);
///
/// impl CandidatePricer for Exact {
///     fn price(&mut self, _: &ContractParams, _: &HestonParams) -> Result<Quote, PricingError> {
///         Ok(Quote {
///             price: self.0,
///             source: PriceSource::Fourier,
///             challenging: false,
///         })
///     }
/// }
///
/// let contract = ContractParams::new(100.0, 100.0, 0.25, 0.05, 0.02).unwrap();
/// let result = Calibrator::default()
///     .solve(&mut Exact(5.0), 5.0, &contract)
///     .unwrap();
///
/// assert_eq!(result.fallback, Some(FallbackReason::DegenerateMatch));
/// assert_eq!(result.evaluations, 1);
/// assert_eq!(result.implied_vol, result.bs_anchor);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Calibrator {
    config: CalibratorConfig,
    anchor_solver: ImpliedVolSolver,
}

impl Calibrator {
    /// Creates a calibrator with the default Black-Scholes solver.
    ///
    /// # Errors
    ///
    /// `PricingError::InvalidInput` if `config` fails validation.
    pub fn new(config: CalibratorConfig) -> Result<Self, PricingError> {
        config.validate()?;
        Ok(Self {
            config,
            anchor_solver: ImpliedVolSolver::default(),
        })
    }

    /// Thresholds and grids in use.
    #[inline]
    pub fn config(&self) -> &CalibratorConfig {
        &self.config
    }

    /// Black-Scholes implied volatility of `market_price`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a non-positive price, `ModelFailure` below the
    /// discounted intrinsic value, `BoundsViolation` when no volatility in
    /// the solver bracket reproduces the price.
    pub fn bs_anchor(
        &self,
        market_price: f64,
        contract: &ContractParams,
    ) -> Result<f64, PricingError> {
        Ok(self.anchor_solver.solve_call(market_price, contract)?)
    }

    /// Candidate parameter sets in search order.
    pub fn candidates<'a>(
        &'a self,
        guess: &'a InitialGuess,
    ) -> impl Iterator<Item = HestonParams> + 'a {
        let c = &self.config;
        c.v0_multipliers.iter().flat_map(move |&mv| {
            let v0 = guess.v0 * mv;
            c.kappa_multipliers.iter().flat_map(move |&mk| {
                let kappa = guess.kappa * mk;
                c.sigma_values.iter().flat_map(move |&sigma| {
                    c.rho_values.iter().filter_map(move |&rho| {
                        HestonParams::new(v0, kappa, v0, sigma, rho).ok()
                    })
                })
            })
        })
    }

    /// Fits Heston parameters to `market_price` and returns the implied
    /// volatility.
    ///
    /// # Errors
    ///
    /// - Errors from the Black-Scholes anchor
    /// - Errors from `pricer`
    /// - `CalibrationNonConvergence` if FFT-priced candidates exist but none
    ///   produced a finite price
    pub fn solve<P: CandidatePricer + ?Sized>(
        &self,
        pricer: &mut P,
        market_price: f64,
        contract: &ContractParams,
    ) -> Result<CalibrationResult, PricingError> {
        let anchor = self.bs_anchor(market_price, contract)?;
        let guess = InitialGuess::from_anchor(contract, anchor);
        debug!(
            anchor,
            v0 = guess.v0,
            kappa = guess.kappa,
            theta = guess.theta,
            "calibration start"
        );

        let mut best: Option<(HestonParams, f64)> = None;
        let mut first_fallback: Option<(HestonParams, f64)> = None;
        let mut evaluations = 0;
        let mut black_scholes_priced = 0;

        for (index, params) in self.candidates(&guess).enumerate() {
            let quote = pricer.price(contract, &params)?;
            evaluations += 1;

            let diff = (quote.price - market_price).abs();
            if quote.source == PriceSource::BlackScholes {
                black_scholes_priced += 1;
                first_fallback.get_or_insert((params, diff));
                trace!(index, "candidate priced by Black-Scholes, skipped");
                continue;
            }
            trace!(index, price = quote.price, diff, "candidate priced");
            if !diff.is_finite() {
                continue;
            }

            if index == 0 && diff < self.config.degenerate_threshold {
                debug!(diff, "first candidate matches market, using Black-Scholes anchor");
                return Ok(CalibrationResult {
                    best_params: params,
                    best_price_diff: diff,
                    implied_vol: anchor,
                    bs_anchor: anchor,
                    evaluations,
                    black_scholes_priced,
                    fallback: Some(FallbackReason::DegenerateMatch),
                });
            }

            if best.map_or(true, |(_, best_diff)| diff < best_diff) {
                best = Some((params, diff));
            }
            if diff < self.config.early_exit_ratio * market_price {
                debug!(index, diff, "acceptable candidate, stopping search");
                break;
            }
        }

        if evaluations > 0 && black_scholes_priced == evaluations {
            if let Some((best_params, best_price_diff)) = first_fallback {
                warn!(
                    candidates = evaluations,
                    anchor, "no candidate priced by the FFT, using Black-Scholes"
                );
                return Ok(CalibrationResult {
                    best_params,
                    best_price_diff,
                    implied_vol: anchor,
                    bs_anchor: anchor,
                    evaluations,
                    black_scholes_priced,
                    fallback: Some(FallbackReason::FourierUnavailable {
                        candidates: evaluations,
                    }),
                });
            }
        }

        let (best_params, best_price_diff) = best.ok_or_else(|| {
            PricingError::CalibrationNonConvergence("no candidate produced a finite price".into())
        })?;
        if black_scholes_priced > 0 {
            debug!(
                black_scholes_priced,
                evaluations, "some candidates skipped after FFT failure"
            );
        }

        let sv_vol = best_params.initial_vol();
        let mut implied_vol = sv_vol;
        let mut fallback = None;

        if best_price_diff > self.config.poor_fit_ratio * market_price {
            let blend_weight = 1.0 - (best_price_diff / market_price).min(1.0);
            implied_vol = blend_weight * sv_vol + (1.0 - blend_weight) * anchor;
            fallback = Some(FallbackReason::PoorFit { blend_weight });
            warn!(
                best_price_diff,
                blend_weight, "poor calibration fit, blending with Black-Scholes"
            );
        }

        let (lower, upper) = self.config.vol_bounds;
        if !(lower..=upper).contains(&implied_vol) {
            warn!(
                rejected = implied_vol,
                anchor, "implied volatility out of bounds, using Black-Scholes"
            );
            fallback = Some(FallbackReason::BoundsViolation {
                rejected: implied_vol,
            });
            implied_vol = anchor;
        }

        Ok(CalibrationResult {
            best_params,
            best_price_diff,
            implied_vol,
            bs_anchor: anchor,
            evaluations,
            black_scholes_priced,
            fallback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn contract(strike: f64, expiry: f64) -> ContractParams {
        ContractParams::new(100.0, strike, expiry, 0.05, 0.02).unwrap()
    }

    #[test]
    fn test_initial_guess_by_moneyness() {
        let atm = InitialGuess::from_anchor(&contract(100.0, 0.5), 0.2);
        assert_relative_eq!(atm.v0, 0.04, epsilon = 1e-15);
        assert_eq!(atm.kappa, 1.0);

        let itm = InitialGuess::from_anchor(&contract(85.0, 0.5), 0.2);
        assert_relative_eq!(itm.v0, 0.044, epsilon = 1e-15);
        assert_relative_eq!(itm.theta, 0.042, epsilon = 1e-15);
        assert_eq!(itm.kappa, 2.0);

        let otm = InitialGuess::from_anchor(&contract(115.0, 0.5), 0.2);
        assert_relative_eq!(otm.v0, 0.042, epsilon = 1e-15);
        assert_eq!(otm.kappa, 1.5);
    }

    #[test]
    fn test_initial_guess_expiry_override() {
        assert_eq!(InitialGuess::from_anchor(&contract(85.0, 0.05), 0.2).kappa, 3.0);
        assert_eq!(InitialGuess::from_anchor(&contract(100.0, 2.0), 0.2).kappa, 0.5);
    }

    #[test]
    fn test_candidate_order_and_count() {
        let calibrator = Calibrator::default();
        let guess = InitialGuess {
            v0: 0.04,
            kappa: 1.0,
            theta: 0.04,
        };
        let all: Vec<HestonParams> = calibrator.candidates(&guess).collect();
        assert_eq!(all.len(), 135);

        // ρ varies fastest, then σ, then κ, then v0
        assert_eq!(all[0].rho(), -0.7);
        assert_eq!(all[1].rho(), -0.4);
        assert_eq!(all[2].rho(), 0.0);
        assert_eq!(all[3].sigma(), 0.4);
        assert_eq!(all[9].kappa(), 1.5);
        assert_relative_eq!(all[27].v0(), 0.04 * 0.85, epsilon = 1e-15);

        assert!(all.iter().all(|p| p.theta() == p.v0()));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = CalibratorConfig {
            rho_values: vec![],
            ..CalibratorConfig::default()
        };
        assert!(matches!(
            Calibrator::new(config),
            Err(PricingError::InvalidInput(_))
        ));
    }
}
