//! Price command implementation
//!
//! Prices a European option under given Heston parameters through the FFT
//! session. Puts are priced from the call by put-call parity.

use clap::Args;
use pricer_core::types::PricingError;
use pricer_models::instruments::OptionType;
use pricer_models::models::HestonParams;
use pricer_pricing::context::{PricingSession, Quote};
use tracing::info;

use super::ContractArgs;
use crate::config::EffectiveConfig;
use crate::Result;

/// Heston parameters given as flags.
#[derive(Debug, Clone, Copy, Args)]
pub struct HestonArgs {
    /// Initial variance v0
    #[arg(long, default_value_t = 0.04)]
    pub v0: f64,

    /// Mean reversion speed κ
    #[arg(long, default_value_t = 1.0)]
    pub kappa: f64,

    /// Long-run variance θ
    #[arg(long, default_value_t = 0.04)]
    pub theta: f64,

    /// Volatility of variance σ
    #[arg(long, default_value_t = 0.4)]
    pub sigma: f64,

    /// Spot/variance correlation ρ
    #[arg(long, default_value_t = -0.7, allow_negative_numbers = true)]
    pub rho: f64,
}

impl HestonArgs {
    fn params(&self) -> Result<HestonParams> {
        let params = HestonParams::new(self.v0, self.kappa, self.theta, self.sigma, self.rho)
            .map_err(PricingError::from)?;
        Ok(params)
    }
}

/// Quote for `contract` under `heston`.
pub fn evaluate(
    contract: &ContractArgs,
    heston: &HestonArgs,
    option_type: OptionType,
    config: &EffectiveConfig,
) -> Result<Quote> {
    let contract = contract.contract()?;
    let params = heston.params()?;
    let mut session = PricingSession::new(config.grid, config.session)?;
    let quote = session.heston_price(&contract, &params, option_type)?;

    info!(
        price = quote.price,
        source = ?quote.source,
        challenging = quote.challenging,
        "option priced"
    );
    Ok(quote)
}

/// Run the price command
pub fn run(
    contract: &ContractArgs,
    heston: &HestonArgs,
    option_type: OptionType,
    config: &EffectiveConfig,
) -> Result<()> {
    let quote = evaluate(contract, heston, option_type, config)?;
    println!("Price: {:.6}", quote.price);
    Ok(())
}
