//! Precomputed frequency-grid terms.
//!
//! The Simpson weights depend only on N and the phase terms
//! `exp(−i·v_j·ln S)` only on (N, η, S). Both are kept for the lifetime
//! of a pricing session and rebuilt only when a key drifts beyond the
//! cache tolerance.

use num_complex::Complex64;
use pricer_core::types::PricingError;
use tracing::debug;

use super::config::GridConfig;

/// Substitute for a zero frequency, keeping φ away from its singular point.
pub const MIN_FREQUENCY: f64 = 1e-10;

/// Frequency v_j = j·η, with v_0 replaced by [`MIN_FREQUENCY`].
#[inline]
pub fn frequency(index: usize, eta: f64) -> f64 {
    let v = index as f64 * eta;
    if v == 0.0 {
        MIN_FREQUENCY
    } else {
        v
    }
}

/// Composite Simpson weight for grid index `index`.
#[inline]
pub fn simpson_weight(index: usize) -> f64 {
    if index == 0 {
        1.0 / 3.0
    } else if index % 2 == 1 {
        4.0 / 3.0
    } else {
        2.0 / 3.0
    }
}

/// Allocates a buffer of `len` copies of `value`, reporting failure instead
/// of aborting.
pub(crate) fn allocate<T: Clone>(
    len: usize,
    value: T,
    buffer: &'static str,
) -> Result<Vec<T>, PricingError> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| PricingError::AllocationFailure { buffer, len })?;
    data.resize(len, value);
    Ok(data)
}

#[derive(Clone, Copy, Debug)]
struct GridKey {
    fft_size: usize,
    eta: f64,
    alpha: f64,
    spot: f64,
}

impl GridKey {
    fn matches(&self, other: &GridKey, tol: f64) -> bool {
        self.fft_size == other.fft_size
            && (self.eta - other.eta).abs() < tol
            && (self.alpha - other.alpha).abs() < tol
            && (self.spot - other.spot).abs() < tol
    }
}

/// Session-scoped Simpson weights and phase terms.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::fft::{GridConfig, PrecomputedGrid};
///
/// let mut grid = PrecomputedGrid::new();
/// let config = GridConfig::default();
///
/// assert!(grid.ensure(&config, 100.0).unwrap());
/// // Same keys: memoized arrays are returned unchanged
/// assert!(!grid.ensure(&config, 100.0).unwrap());
/// assert_eq!(grid.builds(), 1);
/// assert_eq!(grid.simpson_weights().len(), 4096);
/// ```
#[derive(Debug, Default)]
pub struct PrecomputedGrid {
    simpson_weights: Vec<f64>,
    exp_terms: Vec<Complex64>,
    key: Option<GridKey>,
    builds: u64,
}

impl PrecomputedGrid {
    /// Creates an empty grid; arrays are allocated on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the arrays current for `config` and `spot`.
    ///
    /// Returns `true` if the arrays were rebuilt, `false` on a hit. Buffers
    /// are reallocated only when N changes.
    ///
    /// # Errors
    ///
    /// `PricingError::AllocationFailure` if a buffer cannot be reserved.
    /// The grid is left empty in that case.
    pub fn ensure(&mut self, config: &GridConfig, spot: f64) -> Result<bool, PricingError> {
        let key = GridKey {
            fft_size: config.fft_size,
            eta: config.eta,
            alpha: config.alpha,
            spot,
        };
        if let Some(current) = &self.key {
            if current.matches(&key, config.cache_tolerance) {
                return Ok(false);
            }
        }

        let n = config.fft_size;
        if self.simpson_weights.len() != n {
            self.key = None;
            self.simpson_weights = Vec::new();
            self.exp_terms = Vec::new();
            self.simpson_weights = allocate(n, 0.0, "simpson_weights")?;
            self.exp_terms = allocate(n, Complex64::new(0.0, 0.0), "exp_terms")?;
        }

        let log_spot = spot.ln();
        for (j, (w, e)) in self
            .simpson_weights
            .iter_mut()
            .zip(self.exp_terms.iter_mut())
            .enumerate()
        {
            *w = simpson_weight(j);
            *e = Complex64::from_polar(1.0, -frequency(j, config.eta) * log_spot);
        }

        self.key = Some(key);
        self.builds += 1;
        debug!(n, eta = config.eta, spot, "rebuilt precomputed grid");
        Ok(true)
    }

    /// Simpson weights; empty before the first build.
    #[inline]
    pub fn simpson_weights(&self) -> &[f64] {
        &self.simpson_weights
    }

    /// Phase terms `exp(−i·v_j·ln S)`; empty before the first build.
    #[inline]
    pub fn exp_terms(&self) -> &[Complex64] {
        &self.exp_terms
    }

    /// Number of rebuilds performed so far.
    #[inline]
    pub fn builds(&self) -> u64 {
        self.builds
    }

    /// Whether the arrays hold a valid build.
    #[inline]
    pub fn is_built(&self) -> bool {
        self.key.is_some()
    }
}
