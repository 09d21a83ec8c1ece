//! Implied volatility entry point.

use pricer_core::types::PricingError;
use pricer_models::instruments::ContractParams;
use pricer_models::models::HestonParams;
use pricer_pricing::context::{PricingSession, SessionOptions};
use pricer_pricing::fft::{FftEngine, GridConfig};
use tracing::debug;

use crate::calibration::{CalibrationResult, Calibrator};

/// Parameter set used to classify a contract before calibration.
const REFERENCE_PARAMS: (f64, f64, f64, f64, f64) = (0.04, 1.0, 0.04, 0.4, -0.7);

/// Outcome of [`price_implied_vol`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImpliedVol {
    /// Implied volatility, finite and positive.
    pub value: f64,
    /// Whether the contract was classified as challenging.
    pub challenging: bool,
    /// Calibration details, including why the value is not the plain
    /// stochastic-volatility estimate when that is the case.
    pub calibration: CalibrationResult,
}

impl ImpliedVol {
    /// Whether the value is anything other than the calibrated estimate.
    pub fn used_fallback(&self) -> bool {
        self.calibration.used_fallback()
    }
}

/// Implied volatility of a European call under the Heston FFT model.
///
/// Builds a fresh [`PricingSession`] on `grid` (default grid if `None`) and
/// runs [`implied_vol_in_session`] with the default [`Calibrator`].
///
/// # Errors
///
/// - `InvalidInput` if the market price is not finite and positive, a
///   contract term is invalid, or `grid` fails validation
/// - `ModelFailure` if the price is below the discounted intrinsic value
/// - `BoundsViolation` if no volatility in the Black-Scholes bracket
///   reproduces the price
///
/// # Examples
///
/// ```
/// use pricer_optimiser::recovery::price_implied_vol;
///
/// let iv = price_implied_vol(5.0, 100.0, 100.0, 0.25, 0.05, 0.02, None).unwrap();
/// assert!(iv.value >= 0.05 && iv.value <= 1.5);
///
/// // Invalid inputs are rejected before any computation
/// assert!(price_implied_vol(-1.0, 100.0, 100.0, 0.25, 0.05, 0.02, None).is_err());
/// ```
pub fn price_implied_vol(
    market_price: f64,
    spot: f64,
    strike: f64,
    expiry: f64,
    rate: f64,
    dividend: f64,
    grid: Option<GridConfig>,
) -> Result<ImpliedVol, PricingError> {
    validate_market_price(market_price)?;
    let contract = ContractParams::new(spot, strike, expiry, rate, dividend)?;
    let mut session = PricingSession::new(grid.unwrap_or_default(), SessionOptions::default())?;
    implied_vol_in_session(&mut session, &Calibrator::default(), market_price, &contract)
}

/// Implied volatility using a caller-owned session and calibrator.
///
/// 1. Classifies the contract with a reference parameter set and adapts
///    the session grid (when the session is adaptive)
/// 2. Calibrates; every candidate price runs under the session's
///    [`RecoveryGuard`](pricer_pricing::recovery::RecoveryGuard) and falls
///    back to Black-Scholes at √v0 when all grids fail
/// 3. If no candidate was priced by the FFT, the calibration returns the
///    Black-Scholes implied volatility and records
///    [`FallbackReason::FourierUnavailable`](crate::calibration::FallbackReason::FourierUnavailable)
///
/// # Errors
///
/// As for [`price_implied_vol`].
pub fn implied_vol_in_session<E: FftEngine>(
    session: &mut PricingSession<E>,
    calibrator: &Calibrator,
    market_price: f64,
    contract: &ContractParams,
) -> Result<ImpliedVol, PricingError> {
    validate_market_price(market_price)?;

    let (v0, kappa, theta, sigma, rho) = REFERENCE_PARAMS;
    let reference = HestonParams::new(v0, kappa, theta, sigma, rho)?;
    let challenging = session.adapt_to(contract, &reference);
    debug!(
        challenging,
        moneyness = contract.moneyness(),
        expiry = contract.expiry(),
        "contract classified"
    );

    let calibration = calibrator.solve(session, market_price, contract)?;
    Ok(ImpliedVol {
        value: calibration.implied_vol,
        challenging,
        calibration,
    })
}

fn validate_market_price(market_price: f64) -> Result<(), PricingError> {
    if !market_price.is_finite() || market_price <= 0.0 {
        return Err(PricingError::InvalidInput(format!(
            "market price must be finite and positive, got {}",
            market_price
        )));
    }
    Ok(())
}
