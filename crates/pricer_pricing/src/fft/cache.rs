//! Memoized price curves.
//!
//! A curve is keyed by the nine model scalars (S, r, q, T, v0, κ, θ, σ, ρ)
//! and the grid (N exact; η, α and range within tolerance). The strike is
//! not part of the key: one curve serves every strike of the contract.
//!
//! With the default capacity of one the cache is a single slot, so a
//! sweep over distinct parameter sets recomputes on every call.

use std::collections::VecDeque;

use pricer_core::types::PricingError;
use pricer_models::instruments::ContractParams;
use pricer_models::models::HestonParams;
use tracing::debug;

use super::config::GridConfig;
use super::grid::allocate;

/// Snapshot of the inputs that produced a curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CacheKey {
    contract: ContractParams,
    params: HestonParams,
    grid: GridConfig,
}

impl CacheKey {
    /// Captures the inputs of one transform run.
    pub fn new(contract: &ContractParams, params: &HestonParams, grid: &GridConfig) -> Self {
        Self {
            contract: *contract,
            params: *params,
            grid: *grid,
        }
    }

    /// The grid this key was taken with.
    #[inline]
    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// True when every scalar is within `tol` of `other` and the grids
    /// match.
    pub fn matches(&self, other: &CacheKey, tol: f64) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() < tol;
        let (c, o) = (&self.contract, &other.contract);
        let (p, q) = (&self.params, &other.params);

        close(c.spot(), o.spot())
            && close(c.rate(), o.rate())
            && close(c.dividend(), o.dividend())
            && close(c.expiry(), o.expiry())
            && close(p.v0(), q.v0())
            && close(p.kappa(), q.kappa())
            && close(p.theta(), q.theta())
            && close(p.sigma(), q.sigma())
            && close(p.rho(), q.rho())
            && self.grid.fft_size == other.grid.fft_size
            && close(self.grid.eta, other.grid.eta)
            && close(self.grid.alpha, other.grid.alpha)
            && close(self.grid.log_strike_range, other.grid.log_strike_range)
    }
}

/// A strike/price curve and the key that produced it.
///
/// `strikes` and `prices` are either both empty or both of length N.
/// Only a valid entry may be read by the interpolator.
#[derive(Debug, Default)]
pub struct CacheEntry {
    strikes: Vec<f64>,
    prices: Vec<f64>,
    key: Option<CacheKey>,
}

impl CacheEntry {
    /// Ascending strikes.
    #[inline]
    pub fn strikes(&self) -> &[f64] {
        &self.strikes
    }

    /// Call prices aligned with [`strikes`](Self::strikes).
    #[inline]
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// Key of the stored curve, if valid.
    #[inline]
    pub fn key(&self) -> Option<&CacheKey> {
        self.key.as_ref()
    }

    /// Whether the entry holds a completed curve.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.key.is_some()
    }

    /// Number of grid points.
    #[inline]
    pub fn len(&self) -> usize {
        self.strikes.len()
    }

    /// Whether no buffers have been allocated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strikes.is_empty()
    }

    /// Mutable strike and price buffers for a transform to fill.
    pub fn buffers_mut(&mut self) -> (&mut [f64], &mut [f64]) {
        (&mut self.strikes, &mut self.prices)
    }

    /// Marks the buffers as a completed curve for `key`.
    pub fn commit(&mut self, key: CacheKey) {
        self.key = Some(key);
    }

    /// Marks the entry invalid, keeping its buffers.
    pub fn invalidate(&mut self) {
        self.key = None;
    }

    fn resize(&mut self, n: usize) -> Result<(), PricingError> {
        if self.strikes.len() == n {
            return Ok(());
        }
        self.strikes = Vec::new();
        self.prices = Vec::new();
        self.strikes = allocate(n, 0.0, "cache_strikes")?;
        self.prices = allocate(n, 0.0, "cache_prices")?;
        Ok(())
    }
}

/// Least-recently-used store of price curves.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::fft::{CacheKey, GridConfig, PriceCache};
/// use pricer_models::instruments::ContractParams;
/// use pricer_models::models::HestonParams;
///
/// let contract = ContractParams::new(100.0, 100.0, 0.25, 0.05, 0.02).unwrap();
/// let params = HestonParams::new(0.04, 1.0, 0.04, 0.4, -0.7).unwrap();
/// let key = CacheKey::new(&contract, &params, &GridConfig::default());
///
/// let mut cache = PriceCache::new(1);
/// assert!(cache.lookup(&key).is_none());
///
/// let mut entry = cache.take_slot(4096).unwrap();
/// entry.commit(key);
/// cache.store(entry);
///
/// assert!(cache.lookup(&key).is_some());
/// assert_eq!((cache.hits(), cache.misses()), (1, 1));
/// ```
#[derive(Debug)]
pub struct PriceCache {
    entries: VecDeque<CacheEntry>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new(1)
    }
}

impl PriceCache {
    /// Creates a cache holding at most `capacity` curves (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Maximum number of stored curves.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored entries, valid or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been stored yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from a stored curve.
    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that required a recompute.
    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Most recently used entry, without touching the counters.
    #[inline]
    pub fn latest(&self) -> Option<&CacheEntry> {
        self.entries.front()
    }

    /// Finds a valid curve matching `key`, using the key's own grid
    /// tolerance. A hit becomes the most recently used entry.
    pub fn lookup(&mut self, key: &CacheKey) -> Option<&CacheEntry> {
        let tol = key.grid().cache_tolerance;
        let position = self
            .entries
            .iter()
            .position(|e| e.key().is_some_and(|k| k.matches(key, tol)));

        match position {
            Some(index) => {
                self.hits += 1;
                if index != 0 {
                    if let Some(entry) = self.entries.remove(index) {
                        self.entries.push_front(entry);
                    }
                }
                debug!(hits = self.hits, "price cache hit");
                self.entries.front()
            }
            None => {
                self.misses += 1;
                debug!(misses = self.misses, "price cache miss");
                None
            }
        }
    }

    /// Removes an invalidated entry sized for N to be overwritten.
    ///
    /// Takes a fresh entry while below capacity, otherwise evicts the
    /// least recently used one. Buffers are reallocated only if their
    /// length differs from `fft_size`. Return the entry with
    /// [`store`](Self::store).
    ///
    /// # Errors
    ///
    /// `PricingError::AllocationFailure` if the buffers cannot be
    /// reallocated; the evicted entry is dropped.
    pub fn take_slot(&mut self, fft_size: usize) -> Result<CacheEntry, PricingError> {
        let mut entry = if self.entries.len() < self.capacity {
            CacheEntry::default()
        } else {
            self.entries.pop_back().unwrap_or_default()
        };
        entry.invalidate();
        entry.resize(fft_size)?;
        Ok(entry)
    }

    /// Stores `entry` as the most recently used, evicting if full.
    pub fn store(&mut self, entry: CacheEntry) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(entry);
    }

    /// Drops every entry; counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
