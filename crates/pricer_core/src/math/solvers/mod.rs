//! Root-finding solvers for numerical computation.
//!
//! ## Available Solvers
//!
//! - [`BisectionSolver`]: Robust bracketing method, used for implied
//!   volatility inversion where the objective is monotone in the unknown
//!
//! ## Configuration
//!
//! Solvers use [`SolverConfig`] for configuring:
//! - `tolerance`: Convergence tolerance on `|f(x)|` (default: 1e-10)
//! - `max_iterations`: Maximum iteration count (default: 100)
//!
//! ## Examples
//!
//! ```
//! use pricer_core::math::solvers::{BisectionSolver, SolverConfig};
//!
//! let solver = BisectionSolver::new(SolverConfig::new(1e-12, 200));
//! let root = solver.find_root(|x: f64| x.exp() - 2.0, 0.0, 1.0).unwrap();
//! assert!((root - 2.0_f64.ln()).abs() < 1e-10);
//! ```

mod bisection;
mod config;

pub use bisection::BisectionSolver;
pub use config::SolverConfig;
