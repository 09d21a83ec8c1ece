//! Stochastic volatility models.
//!
//! - [`heston`]: Heston parameters and characteristic function

pub mod heston;

pub use heston::{HestonCharacteristicFunction, HestonError, HestonParams};
