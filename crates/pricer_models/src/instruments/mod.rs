//! European option contract terms.
//!
//! - [`ContractParams`]: spot, strike, expiry, rate and dividend yield
//! - [`OptionType`]: call or put
//! - [`InstrumentError`]: validation failures

mod error;
mod params;

pub use error::InstrumentError;
pub use params::{ContractParams, OptionType};
