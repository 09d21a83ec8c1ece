//! Calibration outcome.

use pricer_models::models::HestonParams;

/// Why a calibration did not return the stochastic-volatility estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FallbackReason {
    /// The first candidate already matched the market price; the
    /// Black-Scholes anchor was returned without searching.
    DegenerateMatch,
    /// The best fit missed the market by more than the poor-fit ratio;
    /// the result blends √v0* with the anchor.
    PoorFit {
        /// Weight of the stochastic-volatility estimate in the blend.
        blend_weight: f64,
    },
    /// The estimate fell outside the accepted bounds; the anchor was
    /// returned instead.
    BoundsViolation {
        /// The rejected estimate.
        rejected: f64,
    },
    /// Every candidate fell back to a Black-Scholes price because the FFT
    /// failed on all grids; the anchor was returned.
    FourierUnavailable {
        /// Number of candidates priced.
        candidates: usize,
    },
}

/// Result of one calibration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalibrationResult {
    /// Best-fitting candidate; the first candidate under
    /// [`FallbackReason::FourierUnavailable`].
    pub best_params: HestonParams,
    /// |model price − market price| of `best_params`.
    pub best_price_diff: f64,
    /// Final implied volatility.
    pub implied_vol: f64,
    /// Black-Scholes implied volatility of the market price.
    pub bs_anchor: f64,
    /// Number of candidate prices computed.
    pub evaluations: usize,
    /// Candidates priced by the Black-Scholes fallback and left out of
    /// the fit.
    pub black_scholes_priced: usize,
    /// Set when the result is not the plain stochastic-volatility estimate.
    pub fallback: Option<FallbackReason>,
}

impl CalibrationResult {
    /// Whether any fallback policy shaped the result.
    #[inline]
    pub fn used_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}
