//! Heston calibration to a single market price.
//!
//! This module provides:
//! - [`Calibrator`]: bounded grid search anchored on the Black-Scholes implied volatility
//! - [`CandidatePricer`]: the pricing seam used by the search
//! - [`CalibratorConfig`]: thresholds and candidate grids
//! - [`CalibrationResult`] and [`FallbackReason`]: outcome and degradation record

mod config;
mod error;
mod grid_search;
mod result;

pub use config::CalibratorConfig;
pub use error::CalibrationError;
pub use grid_search::{Calibrator, CandidatePricer, InitialGuess};
pub use result::{CalibrationResult, FallbackReason};
