//! Carr-Madan FFT pricing pipeline.
//!
//! Components, in the order a price request flows through them:
//!
//! - [`ParameterAdapter`]: classifies the contract and adapts the grid
//! - [`PrecomputedGrid`]: Simpson weights and phase terms for (N, η, α, S)
//! - [`PriceCache`]: memoized curves keyed by model and grid scalars
//! - [`CarrMadanTransform`]: builds the FFT input and extracts the curve
//! - [`StrikeInterpolator`]: reads one strike off the curve

pub mod adapter;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod interpolate;
pub mod transform;

pub use adapter::ParameterAdapter;
pub use cache::{CacheEntry, CacheKey, PriceCache};
pub use config::GridConfig;
pub use engine::{FftEngine, RustFftEngine};
pub use error::ConfigError;
pub use grid::PrecomputedGrid;
pub use interpolate::StrikeInterpolator;
pub use transform::{CarrMadanTransform, TransformStats};
