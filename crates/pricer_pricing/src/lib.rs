//! # Pricer Pricing (Layer 3: Fourier Pricing Engine)
//!
//! ## Layer 3 Role
//!
//! pricer_pricing turns a Heston parameter set into option prices with the
//! Carr-Madan FFT method:
//! - Grid configuration, validation and recovery presets (`fft::config`)
//! - Session-scoped precomputed grid and price cache (`fft::grid`, `fft::cache`)
//! - The transform itself over a pluggable FFT engine (`fft::transform`, `fft::engine`)
//! - Strike interpolation and contract-driven grid adaptation
//! - [`context::PricingSession`], the explicit owner of all of the above
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_models::instruments::ContractParams;
//! use pricer_models::models::HestonParams;
//! use pricer_pricing::context::PricingSession;
//!
//! let mut session = PricingSession::with_defaults();
//! let params = HestonParams::new(0.04, 1.5, 0.04, 0.3, -0.6).unwrap();
//!
//! for strike in [90.0, 100.0, 110.0] {
//!     let contract = ContractParams::new(100.0, strike, 0.5, 0.03, 0.01).unwrap();
//!     let quote = session.heston_call_price(&contract, &params).unwrap();
//!     assert!(quote.price >= 0.0);
//! }
//!
//! // One curve serves every strike of the same contract
//! assert_eq!(session.transform_runs(), 1);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Serialisation for `GridConfig` and `SessionOptions`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod context;
pub mod fft;
pub mod recovery;

pub use context::{PriceSource, PricingSession, Quote, SessionOptions};
pub use fft::GridConfig;
