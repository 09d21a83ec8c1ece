//! Bounded retry over alternate grid configurations.
//!
//! A [`RecoveryGuard`] runs an operation with a primary [`GridConfig`] and,
//! when it fails with a recoverable error (numerical instability or
//! allocation failure), retries with a short list of presets. Any other
//! error is returned immediately. There is no unconditional repetition:
//! the number of attempts is fixed when the guard is built.

use pricer_core::types::PricingError;
use tracing::debug;

use crate::fft::GridConfig;

/// Successful outcome of a guarded operation.
#[derive(Clone, Debug, PartialEq)]
pub struct Recovered<T> {
    /// Value produced by the operation.
    pub value: T,
    /// Zero-based attempt that succeeded; 0 is the primary config.
    pub attempt: usize,
    /// Configuration of the successful attempt.
    pub config: GridConfig,
}

impl<T> Recovered<T> {
    /// Whether an alternate preset was needed.
    #[inline]
    pub fn used_preset(&self) -> bool {
        self.attempt > 0
    }
}

/// Retry loop over a fixed list of grid configurations.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::PricingError;
/// use pricer_pricing::fft::GridConfig;
/// use pricer_pricing::recovery::RecoveryGuard;
///
/// let guard = RecoveryGuard::new(GridConfig::default(), 2);
/// let outcome = guard
///     .run(|config| {
///         if config.fft_size == 4096 {
///             Err(PricingError::NumericalInstability("overflow".into()))
///         } else {
///             Ok(config.fft_size)
///         }
///     })
///     .unwrap();
///
/// assert_eq!(outcome.value, 8192);
/// assert_eq!(outcome.attempt, 1);
/// ```
#[derive(Clone, Debug)]
pub struct RecoveryGuard {
    configs: Vec<GridConfig>,
}

impl RecoveryGuard {
    /// Guard trying `primary` first, then up to `max_retries` of its
    /// [`recovery_presets`](GridConfig::recovery_presets).
    pub fn new(primary: GridConfig, max_retries: usize) -> Self {
        let configs = std::iter::once(primary)
            .chain(primary.recovery_presets().into_iter().take(max_retries))
            .collect();
        Self { configs }
    }

    /// Configurations in the order they are tried.
    #[inline]
    pub fn configs(&self) -> &[GridConfig] {
        &self.configs
    }

    /// Runs `op` until it succeeds or the configurations are exhausted.
    ///
    /// # Errors
    ///
    /// The first non-recoverable error, or the last recoverable one when
    /// every configuration failed.
    pub fn run<T, F>(&self, mut op: F) -> Result<Recovered<T>, PricingError>
    where
        F: FnMut(&GridConfig) -> Result<T, PricingError>,
    {
        let mut last_error = None;
        for (attempt, config) in self.configs.iter().enumerate() {
            match op(config) {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(attempt, n = config.fft_size, "recovered with alternate grid");
                    }
                    return Ok(Recovered {
                        value,
                        attempt,
                        config: *config,
                    });
                }
                Err(err) if err.is_recoverable() => {
                    debug!(attempt, error = %err, "recoverable failure, trying next grid");
                    last_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            PricingError::NumericalInstability("no grid configuration to try".to_string())
        }))
    }
}
