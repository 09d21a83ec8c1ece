//! # pricer_optimiser
//!
//! Heston calibration and the implied-volatility fallback chain.
//!
//! This crate sits on top of the FFT pricing engine (L3), solving the
//! inverse problem: which volatility does a market price imply?
//!
//! ## Architecture Position
//!
//! Layer 4 of the pricer stack. Depends on `pricer_core` (L1),
//! `pricer_models` (L2) and `pricer_pricing` (L3).
//!
//! ## Modules
//!
//! - `calibration`: bounded grid search over (v0, κ, σ, ρ) anchored on Black-Scholes
//! - `recovery`: retry over alternate grids and the `price_implied_vol` entry point
//!
//! ## Example
//!
//! ```rust
//! use pricer_optimiser::recovery::price_implied_vol;
//!
//! let iv = price_implied_vol(5.0, 100.0, 100.0, 0.25, 0.05, 0.02, None).unwrap();
//! println!("{:.6}", iv.value);
//! ```

#![deny(missing_docs)]

pub mod calibration;
pub mod recovery;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::calibration::*;
    pub use crate::recovery::*;
}
