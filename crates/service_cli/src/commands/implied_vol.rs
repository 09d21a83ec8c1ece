//! Implied volatility command implementation
//!
//! Calibrates the Heston FFT model to one market price and prints the
//! implied volatility with six decimals.

use pricer_optimiser::calibration::Calibrator;
use pricer_optimiser::recovery::{implied_vol_in_session, ImpliedVol};
use pricer_pricing::context::PricingSession;
use tracing::info;

use super::ContractArgs;
use crate::config::EffectiveConfig;
use crate::Result;

/// Implied volatility of `market_price` for `args` under `config`.
pub fn evaluate(
    market_price: f64,
    args: &ContractArgs,
    config: &EffectiveConfig,
) -> Result<ImpliedVol> {
    let contract = args.contract()?;
    let mut session = PricingSession::new(config.grid, config.session)?;
    let iv = implied_vol_in_session(&mut session, &Calibrator::default(), market_price, &contract)?;

    info!(
        value = iv.value,
        challenging = iv.challenging,
        black_scholes_priced = iv.calibration.black_scholes_priced,
        fallback = ?iv.calibration.fallback,
        "implied volatility computed"
    );
    Ok(iv)
}

/// Run the implied-vol command
pub fn run(market_price: f64, args: &ContractArgs, config: &EffectiveConfig) -> Result<()> {
    let iv = evaluate(market_price, args, config)?;
    println!("{:.6}", iv.value);
    Ok(())
}
