//! Closed-form Black-Scholes pricing for European options.
//!
//! This module provides:
//! - [`BlackScholes`]: call/put prices with continuous dividend yield
//! - [`ImpliedVolSolver`]: bisection inversion of the call price for σ
//! - [`norm_cdf`], [`norm_pdf`]: standard normal distribution helpers
//!
//! The Heston FFT engine uses these as its calibration anchor and as the
//! terminal fallback when the transform cannot produce a usable price.

pub mod black_scholes;
pub mod distributions;
pub mod error;
pub mod implied_vol;

pub use black_scholes::BlackScholes;
pub use distributions::{norm_cdf, norm_pdf};
pub use error::AnalyticalError;
pub use implied_vol::ImpliedVolSolver;
