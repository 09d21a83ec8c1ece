//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod check;
pub mod implied_vol;
pub mod price;

use clap::Args;
use pricer_core::types::PricingError;
use pricer_models::instruments::ContractParams;

use crate::Result;

/// European contract terms given as positional arguments.
#[derive(Debug, Clone, Copy, Args)]
pub struct ContractArgs {
    /// Spot price S
    pub spot: f64,

    /// Strike K
    pub strike: f64,

    /// Time to expiry T in years
    pub expiry: f64,

    /// Continuously compounded risk-free rate r
    #[arg(allow_negative_numbers = true)]
    pub rate: f64,

    /// Continuous dividend yield q
    #[arg(allow_negative_numbers = true)]
    pub dividend: f64,
}

impl ContractArgs {
    /// Validated contract.
    pub fn contract(&self) -> Result<ContractParams> {
        let contract =
            ContractParams::new(self.spot, self.strike, self.expiry, self.rate, self.dividend)
                .map_err(PricingError::from)?;
        Ok(contract)
    }
}
