//! # Pricer Models (L2: Business Logic)
//!
//! Contract terms, the Heston stochastic-volatility model and the
//! Black-Scholes closed form used as calibration anchor and fallback.
//!
//! This crate provides:
//! - [`instruments::ContractParams`]: validated European option terms
//! - [`models::heston`]: Heston parameters and characteristic function
//! - [`analytical`]: Black-Scholes pricing with dividend yield and
//!   bisection-based implied volatility
//!
//! ## Design Principles
//!
//! - **Validated construction**: invalid terms are rejected before any
//!   numerical work starts
//! - **Guarded numerics**: the characteristic function never returns NaN
//!   or infinity to its caller

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod instruments;
pub mod models;
