//! Grid and session configuration for the CLI.
//!
//! Priority (highest to lowest):
//! 1. Command-line flags
//! 2. Environment variables (`FFT_N`, `FFT_ETA`, `FFT_ALPHA`,
//!    `FFT_LOG_STRIKE_RANGE`, `FFT_CACHE_TOLERANCE`)
//! 3. TOML config file (`--config`)
//! 4. Default values
//!
//! ```toml
//! [grid]
//! fft_size = 8192
//! eta = 0.05
//!
//! [session]
//! adaptive = false
//! max_retries = 1
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use clap::Args;
use pricer_core::types::PricingError;
use pricer_pricing::context::SessionOptions;
use pricer_pricing::fft::GridConfig;
use serde::Deserialize;

use crate::error::{CliError, Result};

/// Environment variable for the FFT size.
pub const ENV_FFT_N: &str = "FFT_N";
/// Environment variable for the frequency spacing.
pub const ENV_FFT_ETA: &str = "FFT_ETA";
/// Environment variable for the damping factor.
pub const ENV_FFT_ALPHA: &str = "FFT_ALPHA";
/// Environment variable for the log-strike half-width.
pub const ENV_FFT_LOG_STRIKE_RANGE: &str = "FFT_LOG_STRIKE_RANGE";
/// Environment variable for the cache tolerance.
pub const ENV_FFT_CACHE_TOLERANCE: &str = "FFT_CACHE_TOLERANCE";

/// Partial grid configuration from one source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Args)]
#[serde(default, deny_unknown_fields)]
pub struct GridOverrides {
    /// FFT size N (power of two)
    #[arg(long)]
    pub fft_size: Option<usize>,

    /// Frequency spacing η
    #[arg(long)]
    pub eta: Option<f64>,

    /// Carr-Madan damping factor α
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Half-width of the log-strike grid around ln S
    #[arg(long)]
    pub log_strike_range: Option<f64>,

    /// Absolute tolerance for reusing a cached price curve
    #[arg(long)]
    pub cache_tolerance: Option<f64>,
}

impl GridOverrides {
    /// Reads overrides through `lookup` (normally `std::env::var`).
    pub fn from_env_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            fft_size: parse_env(&lookup, ENV_FFT_N)?,
            eta: parse_env(&lookup, ENV_FFT_ETA)?,
            alpha: parse_env(&lookup, ENV_FFT_ALPHA)?,
            log_strike_range: parse_env(&lookup, ENV_FFT_LOG_STRIKE_RANGE)?,
            cache_tolerance: parse_env(&lookup, ENV_FFT_CACHE_TOLERANCE)?,
        })
    }

    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Fills every unset field from `lower`.
    pub fn or(self, lower: GridOverrides) -> Self {
        Self {
            fft_size: self.fft_size.or(lower.fft_size),
            eta: self.eta.or(lower.eta),
            alpha: self.alpha.or(lower.alpha),
            log_strike_range: self.log_strike_range.or(lower.log_strike_range),
            cache_tolerance: self.cache_tolerance.or(lower.cache_tolerance),
        }
    }

    /// Applies the set fields on top of `base`.
    pub fn apply(&self, base: GridConfig) -> GridConfig {
        let mut config = base;
        if let Some(n) = self.fft_size {
            config = config.with_fft_size(n);
        }
        if let Some(eta) = self.eta {
            config = config.with_eta(eta);
        }
        if let Some(alpha) = self.alpha {
            config = config.with_alpha(alpha);
        }
        if let Some(range) = self.log_strike_range {
            config = config.with_log_strike_range(range);
        }
        if let Some(tolerance) = self.cache_tolerance {
            config = config.with_cache_tolerance(tolerance);
        }
        config
    }
}

fn parse_env<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CliError::InvalidEnv { name, value: raw }),
    }
}

/// Contents of a TOML config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Grid overrides.
    pub grid: GridOverrides,
    /// Session capability flags.
    pub session: SessionOptions,
}

impl FileConfig {
    /// Loads a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Configuration after layering every source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveConfig {
    /// Validated grid.
    pub grid: GridConfig,
    /// Session options.
    pub session: SessionOptions,
}

impl fmt::Display for EffectiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "fft_size         = {}", self.grid.fft_size)?;
        writeln!(f, "eta              = {}", self.grid.eta)?;
        writeln!(f, "alpha            = {}", self.grid.alpha)?;
        writeln!(f, "log_strike_range = {}", self.grid.log_strike_range)?;
        writeln!(f, "cache_tolerance  = {}", self.grid.cache_tolerance)?;
        writeln!(f, "strike_spacing   = {:.6}", self.grid.strike_spacing())?;
        writeln!(f, "adaptive         = {}", self.session.adaptive)?;
        writeln!(f, "cache_capacity   = {}", self.session.cache_capacity)?;
        write!(f, "max_retries      = {}", self.session.max_retries)
    }
}

/// Layers flags over environment over file over defaults and validates
/// the resulting grid. Invalid values are rejected, never clamped.
pub fn layer(
    file: FileConfig,
    env: GridOverrides,
    flags: &GridOverrides,
    no_adapt: bool,
) -> Result<EffectiveConfig> {
    let grid = flags.or(env).or(file.grid).apply(GridConfig::default());
    grid.validate().map_err(PricingError::from)?;

    let mut session = file.session;
    if no_adapt {
        session.adaptive = false;
    }
    Ok(EffectiveConfig { grid, session })
}

/// Builds the effective configuration from all sources.
pub fn build_config(
    config_path: Option<&Path>,
    flags: &GridOverrides,
    no_adapt: bool,
) -> Result<EffectiveConfig> {
    let file = match config_path {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    layer(file, GridOverrides::from_env()?, flags, no_adapt)
}
