//! Bisection root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Bisection root finder.
///
/// Halves a sign-changing bracket until `|f(x)| < tolerance`. Slower than
/// Brent-type methods but never leaves the bracket, which matters when the
/// objective is only reliable inside it (e.g. Black-Scholes price in σ).
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::{BisectionSolver, SolverConfig};
///
/// let solver = BisectionSolver::new(SolverConfig::default());
///
/// // Solve x³ - x - 2 = 0 in bracket [1, 2]
/// let f = |x: f64| x * x * x - x - 2.0;
/// let root = solver.find_root(f, 1.0, 2.0).unwrap();
/// assert!(f(root).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct BisectionSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> BisectionSolver<T> {
    /// Create a new bisection solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Returns the solver configuration.
    #[inline]
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }

    /// Find a root of `f` in the bracket [a, b].
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - Root where `|f(x)| < tolerance`, or the midpoint once the
    ///   bracket has collapsed to machine precision
    /// * `Err(SolverError::NoBracket)` - `f(a)` and `f(b)` have same sign
    /// * `Err(SolverError::NumericalInstability)` - `f` returned a non-finite value
    /// * `Err(SolverError::MaxIterationsExceeded)` - Failed to converge
    pub fn find_root<F>(&self, f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let (mut lo, mut hi) = if a <= b { (a, b) } else { (b, a) };
        let mut f_lo = f(lo);
        let f_hi = f(hi);

        if !f_lo.is_finite() || !f_hi.is_finite() {
            return Err(SolverError::NumericalInstability(format!(
                "non-finite objective at bracket endpoints [{}, {}]",
                lo.to_f64().unwrap_or(f64::NAN),
                hi.to_f64().unwrap_or(f64::NAN)
            )));
        }

        if f_lo.abs() < self.config.tolerance {
            return Ok(lo);
        }
        if f_hi.abs() < self.config.tolerance {
            return Ok(hi);
        }

        if f_lo * f_hi > T::zero() {
            return Err(SolverError::NoBracket {
                a: lo.to_f64().unwrap_or(f64::NAN),
                b: hi.to_f64().unwrap_or(f64::NAN),
            });
        }

        let two = T::one() + T::one();

        for _ in 0..self.config.max_iterations {
            let mid = lo + (hi - lo) / two;
            let f_mid = f(mid);

            if !f_mid.is_finite() {
                return Err(SolverError::NumericalInstability(format!(
                    "non-finite objective at x = {}",
                    mid.to_f64().unwrap_or(f64::NAN)
                )));
            }

            if f_mid.abs() < self.config.tolerance || mid <= lo || mid >= hi {
                return Ok(mid);
            }

            if f_lo * f_mid < T::zero() {
                hi = mid;
            } else {
                lo = mid;
                f_lo = f_mid;
            }
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }
}
