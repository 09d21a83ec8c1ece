//! Calibrator configuration.

use super::error::CalibrationError;

/// Thresholds and candidate grids of the Heston grid search.
///
/// Thresholds are absolute (`degenerate_threshold`) or relative to the
/// market price (`early_exit_ratio`, `poor_fit_ratio`).
///
/// # Examples
///
/// ```
/// use pricer_optimiser::calibration::CalibratorConfig;
///
/// let config = CalibratorConfig::default();
/// assert_eq!(config.candidate_count(), 135);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CalibratorConfig {
    /// Stop searching once |price − market| < ratio·market.
    ///
    /// Default: 0.005
    pub early_exit_ratio: f64,

    /// First-candidate difference below which the Black-Scholes anchor
    /// is returned without searching.
    ///
    /// Default: 0.01
    pub degenerate_threshold: f64,

    /// Best difference above ratio·market triggers the blend with the
    /// Black-Scholes anchor.
    ///
    /// Default: 0.1
    pub poor_fit_ratio: f64,

    /// Accepted implied volatility range, inclusive.
    ///
    /// Default: (0.05, 1.5)
    pub vol_bounds: (f64, f64),

    /// Multipliers applied to the initial v0 guess (outermost loop).
    pub v0_multipliers: Vec<f64>,

    /// Multipliers applied to the initial κ guess.
    pub kappa_multipliers: Vec<f64>,

    /// Vol-of-vol values.
    pub sigma_values: Vec<f64>,

    /// Correlation values (innermost loop).
    pub rho_values: Vec<f64>,
}

impl Default for CalibratorConfig {
    fn default() -> Self {
        Self {
            early_exit_ratio: 0.005,
            degenerate_threshold: 0.01,
            poor_fit_ratio: 0.1,
            vol_bounds: (0.05, 1.5),
            v0_multipliers: vec![1.0, 0.85, 1.15, 0.7, 1.3],
            kappa_multipliers: vec![1.0, 1.5, 0.5],
            sigma_values: vec![0.2, 0.4, 0.6],
            rho_values: vec![-0.7, -0.4, 0.0],
        }
    }
}

impl CalibratorConfig {
    /// Size of the full candidate grid.
    pub fn candidate_count(&self) -> usize {
        self.v0_multipliers.len()
            * self.kappa_multipliers.len()
            * self.sigma_values.len()
            * self.rho_values.len()
    }

    /// Validates thresholds and grids.
    ///
    /// # Errors
    ///
    /// - `InvalidThreshold` for a non-positive or non-finite threshold
    /// - `InvalidBounds` unless `0 < lower < upper`
    /// - `EmptyGrid` for an empty candidate grid
    /// - `InvalidGridValue` for multipliers that are not positive, negative
    ///   σ, or ρ outside [−1, 1]
    pub fn validate(&self) -> Result<(), CalibrationError> {
        for (name, value) in [
            ("early_exit_ratio", self.early_exit_ratio),
            ("degenerate_threshold", self.degenerate_threshold),
            ("poor_fit_ratio", self.poor_fit_ratio),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalibrationError::InvalidThreshold { name, value });
            }
        }

        let (lower, upper) = self.vol_bounds;
        if !lower.is_finite() || !upper.is_finite() || lower <= 0.0 || lower >= upper {
            return Err(CalibrationError::InvalidBounds { lower, upper });
        }

        let grids: [(&'static str, &[f64], fn(f64) -> bool); 4] = [
            ("v0_multipliers", self.v0_multipliers.as_slice(), |m| m > 0.0),
            ("kappa_multipliers", self.kappa_multipliers.as_slice(), |m| m > 0.0),
            ("sigma_values", self.sigma_values.as_slice(), |s| s >= 0.0),
            ("rho_values", self.rho_values.as_slice(), |r| (-1.0..=1.0).contains(&r)),
        ];
        for (name, values, valid) in grids {
            if values.is_empty() {
                return Err(CalibrationError::EmptyGrid { name });
            }
            if let Some(&value) = values.iter().find(|v| !v.is_finite() || !valid(**v)) {
                return Err(CalibrationError::InvalidGridValue { name, value });
            }
        }
        Ok(())
    }
}
