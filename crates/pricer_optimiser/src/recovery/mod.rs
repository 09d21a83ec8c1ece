//! Implied-volatility entry point and its fallback chain.
//!
//! Per-price grid recovery lives in the pricing session; [`price_implied_vol`]
//! adds contract classification, calibration and the terminal Black-Scholes
//! fallback into one call.

mod implied;

pub use implied::{implied_vol_in_session, price_implied_vol, ImpliedVol};
