//! FFT grid configuration.
//!
//! A [`GridConfig`] fixes the discretisation of the Carr-Madan integral:
//! the FFT length N, the frequency step η, the damping exponent α, the
//! log-strike half-range of the output curve and the tolerance used by
//! the session caches when comparing keys.

use super::error::ConfigError;

/// Smallest accepted FFT length.
pub const MIN_FFT_SIZE: usize = 2;

/// Largest accepted FFT length.
pub const MAX_FFT_SIZE: usize = 1 << 20;

/// Default FFT length.
pub const DEFAULT_FFT_SIZE: usize = 4096;

/// Default frequency step η.
pub const DEFAULT_ETA: f64 = 0.05;

/// Default damping exponent α.
pub const DEFAULT_ALPHA: f64 = 1.5;

/// Default log-strike half-range.
pub const DEFAULT_LOG_STRIKE_RANGE: f64 = 3.0;

/// Default cache comparison tolerance.
pub const DEFAULT_CACHE_TOLERANCE: f64 = 1e-5;

/// Discretisation parameters of the Carr-Madan transform.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::fft::GridConfig;
///
/// let config = GridConfig::default().with_fft_size(8192).with_eta(0.025);
/// assert!(config.validate().is_ok());
///
/// // Not a power of two
/// assert!(GridConfig::default().with_fft_size(1000).validate().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// FFT length N (power of two).
    pub fft_size: usize,
    /// Frequency step η.
    pub eta: f64,
    /// Damping exponent α.
    pub alpha: f64,
    /// Half-width of the log-strike range around ln S.
    pub log_strike_range: f64,
    /// Absolute tolerance for cache key comparison, |a − b| < tol.
    pub cache_tolerance: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            fft_size: DEFAULT_FFT_SIZE,
            eta: DEFAULT_ETA,
            alpha: DEFAULT_ALPHA,
            log_strike_range: DEFAULT_LOG_STRIKE_RANGE,
            cache_tolerance: DEFAULT_CACHE_TOLERANCE,
        }
    }
}

impl GridConfig {
    /// Sets the FFT length.
    #[inline]
    pub fn with_fft_size(mut self, fft_size: usize) -> Self {
        self.fft_size = fft_size;
        self
    }

    /// Sets the frequency step.
    #[inline]
    pub fn with_eta(mut self, eta: f64) -> Self {
        self.eta = eta;
        self
    }

    /// Sets the damping exponent.
    #[inline]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the log-strike half-range.
    #[inline]
    pub fn with_log_strike_range(mut self, range: f64) -> Self {
        self.log_strike_range = range;
        self
    }

    /// Sets the cache comparison tolerance.
    #[inline]
    pub fn with_cache_tolerance(mut self, tolerance: f64) -> Self {
        self.cache_tolerance = tolerance;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `fft_size` is not a power of two in [`MIN_FFT_SIZE`, `MAX_FFT_SIZE`]
    /// - `eta`, `alpha`, `log_strike_range` or `cache_tolerance` is not
    ///   finite and strictly positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fft_size.is_power_of_two()
            || !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&self.fft_size)
        {
            return Err(ConfigError::InvalidFftSize(self.fft_size));
        }

        for (name, value) in [
            ("eta", self.eta),
            ("alpha", self.alpha),
            ("log_strike_range", self.log_strike_range),
            ("cache_tolerance", self.cache_tolerance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        Ok(())
    }

    /// Log-strike spacing of the output curve, 2·range/N.
    #[inline]
    pub fn strike_spacing(&self) -> f64 {
        2.0 * self.log_strike_range / self.fft_size as f64
    }

    /// True when `other` describes the same grid: equal N, and η, α and
    /// range each within this config's cache tolerance.
    pub fn matches(&self, other: &GridConfig) -> bool {
        let tol = self.cache_tolerance;
        self.fft_size == other.fft_size
            && (self.eta - other.eta).abs() < tol
            && (self.alpha - other.alpha).abs() < tol
            && (self.log_strike_range - other.log_strike_range).abs() < tol
    }

    /// Alternate grids tried, in order, after a recoverable failure.
    ///
    /// Both presets keep the range and tolerance of `self`.
    pub fn recovery_presets(&self) -> [GridConfig; 2] {
        [
            self.with_fft_size(8192).with_alpha(1.0).with_eta(0.1),
            self.with_fft_size(2048).with_alpha(1.25).with_eta(0.075),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GridConfig::default();
        assert_eq!(config.fft_size, 4096);
        assert_eq!(config.eta, 0.05);
        assert_eq!(config.alpha, 1.5);
        assert_eq!(config.log_strike_range, 3.0);
        assert_eq!(config.cache_tolerance, 1e-5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_fft_size() {
        for n in [0, 1, 3, 1000, 4097, MAX_FFT_SIZE * 2] {
            assert_eq!(
                GridConfig::default().with_fft_size(n).validate(),
                Err(ConfigError::InvalidFftSize(n))
            );
        }
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let cases = [
            GridConfig::default().with_eta(0.0),
            GridConfig::default().with_alpha(-1.5),
            GridConfig::default().with_log_strike_range(f64::NAN),
            GridConfig::default().with_cache_tolerance(f64::INFINITY),
        ];
        for config in cases {
            assert!(matches!(
                config.validate(),
                Err(ConfigError::NonPositive { .. })
            ));
        }
    }

    #[test]
    fn test_strike_spacing() {
        let config = GridConfig::default();
        assert_eq!(config.strike_spacing(), 6.0 / 4096.0);
    }

    #[test]
    fn test_matches_within_tolerance() {
        let base = GridConfig::default();
        assert!(base.matches(&base.with_eta(0.05 + 1e-7)));
        assert!(!base.matches(&base.with_eta(0.05 + 1e-4)));
        assert!(!base.matches(&base.with_fft_size(8192)));
        assert!(!base.matches(&base.with_log_strike_range(4.0)));
    }

    #[test]
    fn test_recovery_presets() {
        let base = GridConfig::default().with_log_strike_range(4.0);
        let [first, second] = base.recovery_presets();
        assert_eq!((first.fft_size, first.alpha, first.eta), (8192, 1.0, 0.1));
        assert_eq!((second.fft_size, second.alpha, second.eta), (2048, 1.25, 0.075));
        assert_eq!(first.log_strike_range, 4.0);
        assert!(first.validate().is_ok() && second.validate().is_ok());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn power_of_two_sizes_validate(exp in 1u32..=20) {
                let config = GridConfig::default().with_fft_size(1usize << exp);
                prop_assert!(config.validate().is_ok());
            }

            #[test]
            fn positive_eta_validates(eta in 1e-6f64..10.0) {
                prop_assert!(GridConfig::default().with_eta(eta).validate().is_ok());
            }
        }
    }
}
