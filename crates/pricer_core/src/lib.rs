//! # pricer_core: Numerical Foundation for Heston FFT Implied Volatility
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core serves as the bottom layer of the pricing stack, providing:
//! - Error types: `PricingError`, `InterpolationError`, `SolverError` (`types::error`)
//! - Bracketing root finders for implied-volatility inversion (`math::solvers`)
//! - Clamped linear interpolation on sorted grids (`math::interpolators`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::math::solvers::{BisectionSolver, SolverConfig};
//! use pricer_core::math::interpolators::interpolate_clamped;
//!
//! let solver = BisectionSolver::new(SolverConfig::default());
//! let root = solver.find_root(|x: f64| x * x - 2.0, 0.0, 2.0).unwrap();
//! assert!((root - std::f64::consts::SQRT_2).abs() < 1e-8);
//!
//! let y = interpolate_clamped(&[1.0_f64, 2.0, 3.0], &[10.0, 20.0, 30.0], 2.5).unwrap();
//! assert!((y - 25.0).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for error types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
