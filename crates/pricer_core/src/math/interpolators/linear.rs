//! Clamped linear interpolation.

use crate::types::InterpolationError;
use num_traits::Float;

/// Piecewise linear interpolation on a non-decreasing grid.
///
/// Query points at or below `xs[0]` return `ys[0]` exactly; points at or
/// above the last abscissa return the last ordinate exactly. Interior
/// points are located by binary search and interpolated between the
/// bracketing pair `xs[i] < x <= xs[i + 1]`.
///
/// # Formula
///
/// ```text
/// y = y_lo + (x - x_lo) / (x_hi - x_lo) * (y_hi - y_lo)
/// ```
///
/// # Returns
///
/// * `Ok(y)` - The interpolated (or clamped) value
/// * `Err(InterpolationError::InvalidInput)` - Mismatched slice lengths
/// * `Err(InterpolationError::InsufficientData)` - Empty grid
/// * `Err(InterpolationError::NonFiniteValue)` - A value used in the result is not finite
///
/// # Example
///
/// ```
/// use pricer_core::math::interpolators::interpolate_clamped;
///
/// let y = interpolate_clamped(&[0.0_f64, 1.0, 2.0], &[0.0, 2.0, 4.0], 0.5).unwrap();
/// assert!((y - 1.0).abs() < 1e-10);
///
/// let err = interpolate_clamped(&[0.0, 1.0], &[0.0, f64::NAN], 0.5);
/// assert!(err.is_err());
/// ```
pub fn interpolate_clamped<T: Float>(xs: &[T], ys: &[T], x: T) -> Result<T, InterpolationError> {
    if xs.len() != ys.len() {
        return Err(InterpolationError::InvalidInput(format!(
            "xs and ys must have same length: got {} and {}",
            xs.len(),
            ys.len()
        )));
    }

    let n = xs.len();
    if n == 0 {
        return Err(InterpolationError::InsufficientData { got: 0, need: 1 });
    }

    if x <= xs[0] {
        return finite_at(ys, 0);
    }
    if x >= xs[n - 1] {
        return finite_at(ys, n - 1);
    }

    // First index with xs[i] >= x; interior query guarantees 1 <= hi <= n - 1
    let hi = xs.partition_point(|&xi| xi < x);
    let lo = hi - 1;

    let y_lo = finite_at(ys, lo)?;
    let y_hi = finite_at(ys, hi)?;
    let (x_lo, x_hi) = (xs[lo], xs[hi]);

    let t = (x - x_lo) / (x_hi - x_lo);
    Ok(y_lo + t * (y_hi - y_lo))
}

#[inline]
fn finite_at<T: Float>(ys: &[T], index: usize) -> Result<T, InterpolationError> {
    let y = ys[index];
    if y.is_finite() {
        Ok(y)
    } else {
        Err(InterpolationError::NonFiniteValue { index })
    }
}
