//! Strike interpolation on a cached price curve.

use pricer_core::math::interpolators::interpolate_clamped;
use pricer_core::types::PricingError;

use super::cache::CacheEntry;

/// Reads a single strike's price off a curve.
///
/// Strikes outside the curve are clamped to the first or last price;
/// interior strikes are linearly interpolated between the bracketing grid
/// points found by binary search.
#[derive(Clone, Copy, Debug, Default)]
pub struct StrikeInterpolator;

impl StrikeInterpolator {
    /// Price at `strike` from a valid cache entry.
    ///
    /// # Errors
    ///
    /// - `NumericalInstability` if the entry is invalid or a bracketing
    ///   price is not finite
    /// - `InvalidInput` if the curve is empty or misaligned
    pub fn price(entry: &CacheEntry, strike: f64) -> Result<f64, PricingError> {
        if !entry.is_valid() {
            return Err(PricingError::NumericalInstability(
                "price curve is not valid".to_string(),
            ));
        }
        Self::interpolate(entry.strikes(), entry.prices(), strike)
    }

    /// Price at `strike` from explicit ascending `strikes` and `prices`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pricer_pricing::fft::StrikeInterpolator;
    ///
    /// let strikes = [80.0, 100.0, 120.0];
    /// let prices = [22.0, 6.0, 1.0];
    ///
    /// assert_eq!(StrikeInterpolator::interpolate(&strikes, &prices, 50.0).unwrap(), 22.0);
    /// assert_eq!(StrikeInterpolator::interpolate(&strikes, &prices, 90.0).unwrap(), 14.0);
    /// assert_eq!(StrikeInterpolator::interpolate(&strikes, &prices, 500.0).unwrap(), 1.0);
    /// ```
    pub fn interpolate(strikes: &[f64], prices: &[f64], strike: f64) -> Result<f64, PricingError> {
        Ok(interpolate_clamped(strikes, prices, strike)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clamps_to_boundaries_exactly() {
        let strikes = [90.0, 95.0, 100.0, 105.0];
        let prices = [12.5, 8.25, 5.0, 2.75];
        assert_eq!(StrikeInterpolator::interpolate(&strikes, &prices, 90.0).unwrap(), 12.5);
        assert_eq!(StrikeInterpolator::interpolate(&strikes, &prices, 10.0).unwrap(), 12.5);
        assert_eq!(StrikeInterpolator::interpolate(&strikes, &prices, 105.0).unwrap(), 2.75);
        assert_eq!(StrikeInterpolator::interpolate(&strikes, &prices, 1e6).unwrap(), 2.75);
    }

    #[test]
    fn test_interior_is_linear() {
        let strikes = [90.0, 100.0];
        let prices = [10.0, 4.0];
        assert_relative_eq!(
            StrikeInterpolator::interpolate(&strikes, &prices, 97.5).unwrap(),
            5.5,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_non_finite_bracket_is_instability() {
        let strikes = [90.0, 100.0, 110.0];
        let prices = [10.0, f64::NAN, 1.0];
        assert!(matches!(
            StrikeInterpolator::interpolate(&strikes, &prices, 95.0),
            Err(PricingError::NumericalInstability(_))
        ));
        // A query that does not touch the bad point still succeeds
        assert_eq!(StrikeInterpolator::interpolate(&strikes, &prices, 80.0).unwrap(), 10.0);
    }

    #[test]
    fn test_invalid_entry_is_rejected() {
        let entry = CacheEntry::default();
        assert!(matches!(
            StrikeInterpolator::price(&entry, 100.0),
            Err(PricingError::NumericalInstability(_))
        ));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn decreasing_curve_stays_decreasing(k1 in 50.0f64..150.0, dk in 0.0f64..50.0) {
                // Synthetic call curve, non-increasing in strike
                let strikes: Vec<f64> = (0..41).map(|i| 50.0 + 5.0 * i as f64).collect();
                let prices: Vec<f64> = strikes.iter().map(|k| (100.0 - k).max(0.0) + 400.0 / k).collect();

                let lo = StrikeInterpolator::interpolate(&strikes, &prices, k1).unwrap();
                let hi = StrikeInterpolator::interpolate(&strikes, &prices, k1 + dk).unwrap();
                prop_assert!(lo >= 0.0);
                prop_assert!(hi <= lo + 1e-12);
            }
        }
    }
}
