//! Black-Scholes implied volatility by bisection.

use pricer_core::math::solvers::{BisectionSolver, SolverConfig};
use pricer_core::types::SolverError;
use tracing::debug;

use super::black_scholes::BlackScholes;
use super::error::AnalyticalError;
use crate::instruments::ContractParams;

/// Inverts the Black-Scholes call price for volatility.
///
/// Searches σ in `[vol_lower, vol_upper]` (default `[0.001, 2.0]`) until
/// the repriced call is within the solver tolerance (default 1e-6) of the
/// market price.
///
/// # Examples
/// ```
/// use pricer_models::analytical::{BlackScholes, ImpliedVolSolver};
/// use pricer_models::instruments::ContractParams;
///
/// let contract = ContractParams::new(100.0, 100.0, 0.25, 0.05, 0.02).unwrap();
/// let market = BlackScholes::for_contract(&contract, 0.2)
///     .unwrap()
///     .price_call(100.0, 0.25);
///
/// let vol = ImpliedVolSolver::default().solve_call(market, &contract).unwrap();
/// assert!((vol - 0.2).abs() < 1e-4);
/// ```
#[derive(Debug, Clone)]
pub struct ImpliedVolSolver {
    solver: BisectionSolver<f64>,
    vol_lower: f64,
    vol_upper: f64,
}

impl Default for ImpliedVolSolver {
    fn default() -> Self {
        Self::new(SolverConfig::implied_volatility(), 0.001, 2.0)
    }
}

impl ImpliedVolSolver {
    /// Creates a solver with an explicit volatility bracket.
    pub fn new(config: SolverConfig<f64>, vol_lower: f64, vol_upper: f64) -> Self {
        Self {
            solver: BisectionSolver::new(config),
            vol_lower,
            vol_upper,
        }
    }

    /// Volatility bracket searched by the solver.
    #[inline]
    pub fn bracket(&self) -> (f64, f64) {
        (self.vol_lower, self.vol_upper)
    }

    /// Implied volatility of a European call quoted at `market_price`.
    ///
    /// # Errors
    /// - `InvalidPrice` for a non-positive or non-finite price
    /// - `BelowIntrinsic` when the price violates the lower arbitrage bound
    /// - `PriceOutOfRange` when no σ in the bracket reproduces the price
    /// - `NumericalInstability` when the bisection fails
    pub fn solve_call(
        &self,
        market_price: f64,
        contract: &ContractParams,
    ) -> Result<f64, AnalyticalError> {
        if !market_price.is_finite() || market_price <= 0.0 {
            return Err(AnalyticalError::InvalidPrice {
                price: market_price,
            });
        }

        let intrinsic = contract.call_intrinsic();
        if market_price < intrinsic {
            return Err(AnalyticalError::BelowIntrinsic {
                price: market_price,
                intrinsic,
            });
        }

        let strike = contract.strike();
        let expiry = contract.expiry();
        let call_at = |vol: f64| -> Result<f64, AnalyticalError> {
            Ok(BlackScholes::for_contract(contract, vol)?.price_call(strike, expiry))
        };

        let min = call_at(self.vol_lower)?;
        let max = call_at(self.vol_upper)?;
        if market_price < min || market_price > max {
            return Err(AnalyticalError::PriceOutOfRange {
                price: market_price,
                min,
                max,
            });
        }

        let objective = |vol: f64| match call_at(vol) {
            Ok(price) => price - market_price,
            Err(_) => f64::NAN,
        };

        let vol = self
            .solver
            .find_root(objective, self.vol_lower, self.vol_upper)
            .map_err(|err| match err {
                SolverError::NoBracket { a, b } => AnalyticalError::PriceOutOfRange {
                    price: market_price,
                    min: a,
                    max: b,
                },
                other => AnalyticalError::NumericalInstability {
                    message: other.to_string(),
                },
            })?;

        debug!(market_price, vol, "Black-Scholes implied volatility");
        Ok(vol)
    }
}
