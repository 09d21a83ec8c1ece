//! Forward FFT primitive.

use num_complex::Complex64;
use pricer_core::types::PricingError;
use rustfft::FftPlanner;

use super::grid::allocate;

/// A length-N forward complex FFT, computed in place.
///
/// Implementations must leave `buffer` holding
/// `X_k = Σ_j x_j·exp(−2πi·jk/N)` (no normalisation).
pub trait FftEngine {
    /// Transforms `buffer` in place.
    ///
    /// # Errors
    ///
    /// Implementations report scratch allocation failure as
    /// `PricingError::AllocationFailure`.
    fn forward(&mut self, buffer: &mut [Complex64]) -> Result<(), PricingError>;
}

impl<E: FftEngine + ?Sized> FftEngine for Box<E> {
    fn forward(&mut self, buffer: &mut [Complex64]) -> Result<(), PricingError> {
        (**self).forward(buffer)
    }
}

/// [`FftEngine`] backed by `rustfft`.
///
/// Plans are memoized by the planner; scratch space is acquired per call.
///
/// # Examples
///
/// ```rust
/// use num_complex::Complex64;
/// use pricer_pricing::fft::{FftEngine, RustFftEngine};
///
/// let mut engine = RustFftEngine::new();
/// let mut buffer = vec![Complex64::new(1.0, 0.0); 8];
/// engine.forward(&mut buffer).unwrap();
///
/// // A constant signal concentrates in bin 0
/// assert!((buffer[0].re - 8.0).abs() < 1e-12);
/// assert!(buffer[1].norm() < 1e-12);
/// ```
pub struct RustFftEngine {
    planner: FftPlanner<f64>,
}

impl RustFftEngine {
    /// Creates an engine with an empty plan cache.
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }
}

impl Default for RustFftEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RustFftEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RustFftEngine").finish_non_exhaustive()
    }
}

impl FftEngine for RustFftEngine {
    fn forward(&mut self, buffer: &mut [Complex64]) -> Result<(), PricingError> {
        if buffer.is_empty() {
            return Ok(());
        }
        let fft = self.planner.plan_fft_forward(buffer.len());
        let scratch_len = fft.get_inplace_scratch_len();
        let mut scratch = allocate(scratch_len, Complex64::new(0.0, 0.0), "fft_scratch")?;
        fft.process_with_scratch(buffer, &mut scratch);
        Ok(())
    }
}
