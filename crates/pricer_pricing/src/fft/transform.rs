//! Carr-Madan FFT transform.
//!
//! For grid index j with frequency v_j (see [`frequency`]), the FFT input
//! sample is
//!
//! ```text
//! ψ(v)  = e^(−rT)·φ(v − (α+1)i) / (α² + α − v² + i(2α+1)v)
//! x_j   = ψ(v_j) · w_j · η · exp(−i·v_j·ln S)
//! ```
//!
//! and output index k maps to log-strike `ln S − range + k·(2·range/N)`
//! with call price `max(0, Re(X_k)·e^(−α·ln K)/π)`.
//!
//! Non-finite values of φ, ψ or X_k are replaced (by `1+0i`, `0` and `0`
//! respectively) and counted in [`TransformStats`].

use std::f64::consts::PI;

use num_complex::Complex64;
use pricer_core::types::PricingError;
use pricer_models::instruments::ContractParams;
use pricer_models::models::{HestonCharacteristicFunction, HestonParams};
use tracing::{debug, trace};

use super::config::GridConfig;
use super::engine::{FftEngine, RustFftEngine};
use super::grid::{allocate, frequency, PrecomputedGrid};

/// Counts of numerical substitutions made by one or more transform runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Characteristic function evaluations replaced by `1+0i`.
    pub cf_substitutions: usize,
    /// Damped input samples replaced by zero.
    pub input_substitutions: usize,
    /// FFT output samples replaced by zero.
    pub output_substitutions: usize,
}

impl TransformStats {
    /// Total number of substitutions.
    #[inline]
    pub fn total(&self) -> usize {
        self.cf_substitutions + self.input_substitutions + self.output_substitutions
    }

    fn accumulate(&mut self, other: &TransformStats) {
        self.cf_substitutions += other.cf_substitutions;
        self.input_substitutions += other.input_substitutions;
        self.output_substitutions += other.output_substitutions;
    }
}

/// Carr-Madan pricer over a pluggable [`FftEngine`].
///
/// Writes a full strike/price curve per run; the caller owns the output
/// buffers. The FFT input buffer is acquired and released on every run.
#[derive(Debug)]
pub struct CarrMadanTransform<E: FftEngine = RustFftEngine> {
    engine: E,
    runs: u64,
    stats: TransformStats,
}

impl Default for CarrMadanTransform<RustFftEngine> {
    fn default() -> Self {
        Self::new(RustFftEngine::new())
    }
}

impl<E: FftEngine> CarrMadanTransform<E> {
    /// Wraps an FFT engine.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            runs: 0,
            stats: TransformStats::default(),
        }
    }

    /// The underlying FFT engine.
    #[inline]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Number of completed runs.
    #[inline]
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Substitutions accumulated over all runs.
    #[inline]
    pub fn stats(&self) -> TransformStats {
        self.stats
    }

    /// Computes the call price curve for `contract` under `params`.
    ///
    /// `grid` must already be built for `config` and the contract spot.
    /// `strikes` and `prices` must both have length N; on success
    /// `strikes` is strictly increasing and every price is finite and
    /// non-negative.
    ///
    /// # Errors
    ///
    /// - `NumericalInstability` if the grid or output buffers do not
    ///   match N, or if every FFT output sample is non-finite
    /// - `AllocationFailure` if the input buffer cannot be reserved
    /// - any error raised by the FFT engine
    pub fn run(
        &mut self,
        grid: &PrecomputedGrid,
        contract: &ContractParams,
        params: &HestonParams,
        config: &GridConfig,
        strikes: &mut [f64],
        prices: &mut [f64],
    ) -> Result<TransformStats, PricingError> {
        let n = config.fft_size;
        if grid.simpson_weights().len() != n || strikes.len() != n || prices.len() != n {
            return Err(PricingError::NumericalInstability(format!(
                "transform buffers do not match FFT size {}",
                n
            )));
        }

        let mut stats = TransformStats::default();
        let mut samples = allocate(n, Complex64::new(0.0, 0.0), "fft_input")?;

        let cf = HestonCharacteristicFunction::new(params, contract);
        let discount = contract.discount_factor();
        let alpha = config.alpha;
        let eta = config.eta;
        let shift = Complex64::new(0.0, -(alpha + 1.0));

        for (j, ((x, w), e)) in samples
            .iter_mut()
            .zip(grid.simpson_weights())
            .zip(grid.exp_terms())
            .enumerate()
        {
            let v = frequency(j, eta);
            let u = Complex64::new(v, 0.0) + shift;
            let phi = cf.try_evaluate(u).unwrap_or_else(|| {
                stats.cf_substitutions += 1;
                trace!(j, v, "non-finite Heston term, substituting 1+0i");
                Complex64::new(1.0, 0.0)
            });

            let denom = Complex64::new(alpha * alpha + alpha - v * v, (2.0 * alpha + 1.0) * v);
            let mut psi = discount * phi / denom;
            if !psi.re.is_finite() || !psi.im.is_finite() {
                stats.input_substitutions += 1;
                trace!(j, v, "non-finite damped sample, substituting 0");
                psi = Complex64::new(0.0, 0.0);
            }
            *x = psi * (w * eta) * e;
        }

        self.engine.forward(&mut samples)?;

        let log_spot = contract.spot().ln();
        let lower = log_spot - config.log_strike_range;
        let spacing = config.strike_spacing();
        for (k, (out, (strike, price))) in samples
            .iter()
            .zip(strikes.iter_mut().zip(prices.iter_mut()))
            .enumerate()
        {
            let log_strike = lower + k as f64 * spacing;
            *strike = log_strike.exp();

            let value = if out.re.is_finite() && out.im.is_finite() {
                out.re * (-alpha * log_strike).exp() / PI
            } else {
                f64::NAN
            };
            *price = if value.is_finite() {
                value.max(0.0)
            } else {
                stats.output_substitutions += 1;
                trace!(k, log_strike, "non-finite FFT output, substituting 0");
                0.0
            };
        }

        if stats.output_substitutions == n {
            return Err(PricingError::NumericalInstability(format!(
                "all {} FFT output samples are non-finite",
                n
            )));
        }

        self.runs += 1;
        self.stats.accumulate(&stats);
        if stats.total() > 0 {
            debug!(
                cf = stats.cf_substitutions,
                input = stats.input_substitutions,
                output = stats.output_substitutions,
                "transform completed with substitutions"
            );
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract() -> ContractParams {
        ContractParams::new(100.0, 100.0, 0.25, 0.05, 0.02).unwrap()
    }

    fn params() -> HestonParams {
        HestonParams::new(0.04, 1.0, 0.04, 0.4, -0.7).unwrap()
    }

    fn run_default(
        transform: &mut CarrMadanTransform,
        config: &GridConfig,
    ) -> Result<(Vec<f64>, Vec<f64>, TransformStats), PricingError> {
        let c = contract();
        let mut grid = PrecomputedGrid::new();
        grid.ensure(config, c.spot())?;
        let mut strikes = vec![0.0; config.fft_size];
        let mut prices = vec![0.0; config.fft_size];
        let stats = transform.run(&grid, &c, &params(), config, &mut strikes, &mut prices)?;
        Ok((strikes, prices, stats))
    }

    #[test]
    fn test_curve_is_finite_non_negative_and_sorted() {
        let mut transform = CarrMadanTransform::default();
        let (strikes, prices, _) = run_default(&mut transform, &GridConfig::default()).unwrap();

        assert_eq!(strikes.len(), 4096);
        assert!(strikes.windows(2).all(|w| w[0] < w[1]));
        assert!(prices.iter().all(|p| p.is_finite() && *p >= 0.0));
        assert_eq!(transform.runs(), 1);
    }

    #[test]
    fn test_strike_grid_spans_log_range() {
        let mut transform = CarrMadanTransform::default();
        let config = GridConfig::default();
        let (strikes, _, _) = run_default(&mut transform, &config).unwrap();

        let lower = 100.0_f64.ln() - 3.0;
        assert!((strikes[0] - lower.exp()).abs() < 1e-9);
        let last = lower + 4095.0 * config.strike_spacing();
        assert!((strikes[4095] - last.exp()).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_mismatched_grid() {
        let mut transform = CarrMadanTransform::default();
        let c = contract();
        let mut grid = PrecomputedGrid::new();
        grid.ensure(&GridConfig::default().with_fft_size(64), c.spot())
            .unwrap();

        let config = GridConfig::default().with_fft_size(128);
        let mut strikes = vec![0.0; 128];
        let mut prices = vec![0.0; 128];
        let result = transform.run(&grid, &c, &params(), &config, &mut strikes, &mut prices);
        assert!(matches!(result, Err(PricingError::NumericalInstability(_))));
        assert_eq!(transform.runs(), 0);
    }

    #[test]
    fn test_zero_vol_of_vol_substitutes_every_sample() {
        let mut transform = CarrMadanTransform::default();
        let c = contract();
        let config = GridConfig::default().with_fft_size(256);
        let mut grid = PrecomputedGrid::new();
        grid.ensure(&config, c.spot()).unwrap();

        let p = HestonParams::new(0.04, 1.0, 0.04, 0.0, 0.0).unwrap();
        let mut strikes = vec![0.0; 256];
        let mut prices = vec![0.0; 256];
        let stats = transform
            .run(&grid, &c, &p, &config, &mut strikes, &mut prices)
            .unwrap();

        assert_eq!(stats.cf_substitutions, 256);
        assert!(prices.iter().all(|p| p.is_finite() && *p >= 0.0));
        assert_eq!(transform.stats(), stats);
    }
}
