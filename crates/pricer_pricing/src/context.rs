//! Pricing session: the explicit owner of all FFT pricing state.
//!
//! A [`PricingSession`] holds the grid configuration, the precomputed grid,
//! the price cache and the transform (with its FFT engine). Every price
//! request goes through a session, so no state is shared between sessions
//! and cache validity is never coupled to anything outside it.
//!
//! # Price request flow
//!
//! 1. Optionally adapt a copy of the session grid ([`ParameterAdapter`])
//! 2. Run the request under a [`RecoveryGuard`] over that grid and its presets
//! 3. Per attempt: refresh the [`PrecomputedGrid`], consult the [`PriceCache`],
//!    run the [`CarrMadanTransform`] on a miss, interpolate the strike
//! 4. If every attempt fails recoverably, price with Black-Scholes at σ = √v0
//!
//! # Example
//!
//! ```rust
//! use pricer_models::instruments::ContractParams;
//! use pricer_models::models::HestonParams;
//! use pricer_pricing::context::{PriceSource, PricingSession};
//!
//! let mut session = PricingSession::with_defaults();
//! let contract = ContractParams::new(100.0, 100.0, 0.25, 0.05, 0.02).unwrap();
//! let params = HestonParams::new(0.04, 1.0, 0.04, 0.4, -0.7).unwrap();
//!
//! let quote = session.heston_call_price(&contract, &params).unwrap();
//! assert!(quote.price.is_finite() && quote.price >= 0.0);
//! assert_eq!(quote.source, PriceSource::Fourier);
//! ```

use pricer_core::types::PricingError;
use pricer_models::analytical::BlackScholes;
use pricer_models::instruments::{ContractParams, OptionType};
use pricer_models::models::HestonParams;
use tracing::{debug, warn};

use crate::fft::{
    CacheKey, CarrMadanTransform, FftEngine, GridConfig, ParameterAdapter, PrecomputedGrid,
    PriceCache, RustFftEngine, StrikeInterpolator, TransformStats,
};
use crate::recovery::RecoveryGuard;

/// Capability flags of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionOptions {
    /// Adapt the grid to challenging contracts.
    pub adaptive: bool,
    /// Number of curves the cache keeps.
    pub cache_capacity: usize,
    /// Number of alternate presets tried after a recoverable failure.
    pub max_retries: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            adaptive: true,
            cache_capacity: 1,
            max_retries: 2,
        }
    }
}

/// Where a session price came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceSource {
    /// FFT curve on the primary (possibly adapted) grid.
    Fourier,
    /// FFT curve on an alternate preset after a recoverable failure.
    RecoveredFourier {
        /// Zero-based attempt that succeeded.
        attempt: usize,
    },
    /// Black-Scholes at σ = √v0 after every grid failed.
    BlackScholes,
}

/// A price and how it was obtained.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quote {
    /// Option price.
    pub price: f64,
    /// Producing method.
    pub source: PriceSource,
    /// Whether the adapter classified the contract as challenging.
    pub challenging: bool,
}

/// Owner of the FFT pricing state for one caller.
#[derive(Debug)]
pub struct PricingSession<E: FftEngine = RustFftEngine> {
    config: GridConfig,
    options: SessionOptions,
    grid: PrecomputedGrid,
    cache: PriceCache,
    transform: CarrMadanTransform<E>,
}

impl PricingSession<RustFftEngine> {
    /// Session over the `rustfft` engine.
    ///
    /// # Errors
    ///
    /// `PricingError::InvalidInput` if `config` fails validation.
    pub fn new(config: GridConfig, options: SessionOptions) -> Result<Self, PricingError> {
        Self::with_engine(config, options, RustFftEngine::new())
    }

    /// Session with the default grid and options.
    pub fn with_defaults() -> Self {
        Self::build(
            GridConfig::default(),
            SessionOptions::default(),
            RustFftEngine::new(),
        )
    }
}

impl<E: FftEngine> PricingSession<E> {
    /// Session over a caller-supplied FFT engine.
    ///
    /// # Errors
    ///
    /// `PricingError::InvalidInput` if `config` fails validation.
    pub fn with_engine(
        config: GridConfig,
        options: SessionOptions,
        engine: E,
    ) -> Result<Self, PricingError> {
        config.validate()?;
        Ok(Self::build(config, options, engine))
    }

    fn build(config: GridConfig, options: SessionOptions, engine: E) -> Self {
        Self {
            config,
            options,
            grid: PrecomputedGrid::new(),
            cache: PriceCache::new(options.cache_capacity),
            transform: CarrMadanTransform::new(engine),
        }
    }

    /// Current session grid.
    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Replaces the session grid.
    ///
    /// # Errors
    ///
    /// `PricingError::InvalidInput` if `config` fails validation; the
    /// session grid is unchanged in that case.
    pub fn set_config(&mut self, config: GridConfig) -> Result<(), PricingError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Capability flags.
    #[inline]
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// The FFT engine.
    #[inline]
    pub fn engine(&self) -> &E {
        self.transform.engine()
    }

    /// The price cache.
    #[inline]
    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    /// The precomputed grid.
    #[inline]
    pub fn grid(&self) -> &PrecomputedGrid {
        &self.grid
    }

    /// Substitutions made by all transforms of this session.
    #[inline]
    pub fn transform_stats(&self) -> TransformStats {
        self.transform.stats()
    }

    /// Number of transforms run by this session.
    #[inline]
    pub fn transform_runs(&self) -> u64 {
        self.transform.runs()
    }

    /// Classifies the pair and adapts the session grid itself.
    ///
    /// The adaptation persists for later requests. With adaptation
    /// disabled only the classification is returned.
    pub fn adapt_to(&mut self, contract: &ContractParams, params: &HestonParams) -> bool {
        if self.options.adaptive {
            ParameterAdapter::classify_and_adapt(contract, params, &mut self.config)
        } else {
            ParameterAdapter::is_challenging(contract, params)
        }
    }

    /// Grid a request for this pair would use, and its classification.
    ///
    /// The session grid is not modified.
    pub fn effective_config(
        &self,
        contract: &ContractParams,
        params: &HestonParams,
    ) -> (GridConfig, bool) {
        let mut config = self.config;
        let challenging = if self.options.adaptive {
            ParameterAdapter::classify_and_adapt(contract, params, &mut config)
        } else {
            ParameterAdapter::is_challenging(contract, params)
        };
        (config, challenging)
    }

    /// Call price on exactly `config`, without adaptation or recovery.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `config` fails validation
    /// - `AllocationFailure` if grid, cache or transform buffers cannot
    ///   be reserved
    /// - `NumericalInstability` if the transform or interpolation
    ///   produces no usable value
    pub fn fourier_call_price(
        &mut self,
        contract: &ContractParams,
        params: &HestonParams,
        config: &GridConfig,
    ) -> Result<f64, PricingError> {
        config.validate()?;
        self.grid.ensure(config, contract.spot())?;

        let key = CacheKey::new(contract, params, config);
        if let Some(entry) = self.cache.lookup(&key) {
            return StrikeInterpolator::price(entry, contract.strike());
        }

        let mut entry = self.cache.take_slot(config.fft_size)?;
        let (strikes, prices) = entry.buffers_mut();
        let outcome = self
            .transform
            .run(&self.grid, contract, params, config, strikes, prices);

        match outcome {
            Ok(_) => {
                entry.commit(key);
                let price = StrikeInterpolator::price(&entry, contract.strike());
                self.cache.store(entry);
                price
            }
            Err(err) => {
                self.cache.store(entry);
                Err(err)
            }
        }
    }

    /// Call price with adaptation, recovery and the Black-Scholes fallback.
    ///
    /// # Errors
    ///
    /// Non-recoverable errors (invalid input, or the Black-Scholes
    /// fallback itself failing).
    pub fn heston_call_price(
        &mut self,
        contract: &ContractParams,
        params: &HestonParams,
    ) -> Result<Quote, PricingError> {
        let (config, challenging) = self.effective_config(contract, params);
        let guard = RecoveryGuard::new(config, self.options.max_retries);

        match guard.run(|cfg| self.fourier_call_price(contract, params, cfg)) {
            Ok(recovered) => {
                let source = if recovered.used_preset() {
                    PriceSource::RecoveredFourier {
                        attempt: recovered.attempt,
                    }
                } else {
                    PriceSource::Fourier
                };
                Ok(Quote {
                    price: recovered.value,
                    source,
                    challenging,
                })
            }
            Err(err) if err.is_recoverable() => {
                warn!(error = %err, "FFT pricing failed on every grid, using Black-Scholes");
                let vol = params.initial_vol();
                let price = BlackScholes::for_contract(contract, vol)
                    .map_err(|e| PricingError::ModelFailure(e.to_string()))?
                    .price_call(contract.strike(), contract.expiry());
                Ok(Quote {
                    price,
                    source: PriceSource::BlackScholes,
                    challenging,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Call or put price; puts come from put-call parity on the call.
    pub fn heston_price(
        &mut self,
        contract: &ContractParams,
        params: &HestonParams,
        option_type: OptionType,
    ) -> Result<Quote, PricingError> {
        let call = self.heston_call_price(contract, params)?;
        match option_type {
            OptionType::Call => Ok(call),
            OptionType::Put => {
                // P = C − S·e^(−qT) + K·e^(−rT)
                let put = (call.price - contract.call_intrinsic()).max(0.0);
                debug!(call = call.price, put, "put from parity");
                Ok(Quote { price: put, ..call })
            }
        }
    }
}
