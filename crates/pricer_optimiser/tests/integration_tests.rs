//! Integration tests for calibration and the implied-volatility chain.
//!
//! These tests verify the Black-Scholes anchor round trip, the search
//! policies (short-circuit, early exit, blending) against scripted pricers,
//! and end-to-end behaviour through a real FFT pricing session.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use num_complex::Complex64;
use pricer_core::types::PricingError;
use pricer_models::analytical::BlackScholes;
use pricer_models::instruments::ContractParams;
use pricer_models::models::HestonParams;
use pricer_optimiser::calibration::{
    Calibrator, CalibratorConfig, CandidatePricer, FallbackReason,
};
use pricer_optimiser::recovery::{implied_vol_in_session, price_implied_vol};
use pricer_pricing::context::{PriceSource, PricingSession, Quote, SessionOptions};
use pricer_pricing::fft::{FftEngine, GridConfig};

fn contract(strike: f64) -> ContractParams {
    ContractParams::new(100.0, strike, 0.25, 0.05, 0.02).unwrap()
}

fn bs_price(c: &ContractParams, vol: f64) -> f64 {
    BlackScholes::for_contract(c, vol)
        .unwrap()
        .price_call(c.strike(), c.expiry())
}

fn fourier(price: f64) -> Quote {
    Quote {
        price,
        source: PriceSource::Fourier,
        challenging: false,
    }
}

fn black_scholes(price: f64) -> Quote {
    Quote {
        price,
        source: PriceSource::BlackScholes,
        challenging: false,
    }
}

/// Pricer returning scripted quotes and recording the candidates it saw.
struct ScriptedPricer<F: FnMut(usize) -> Quote> {
    script: F,
    seen: Vec<HestonParams>,
}

impl<F: FnMut(usize) -> Quote> ScriptedPricer<F> {
    fn new(script: F) -> Self {
        Self {
            script,
            seen: Vec::new(),
        }
    }
}

impl<F: FnMut(usize) -> Quote> CandidatePricer for ScriptedPricer<F> {
    fn price(&mut self, _: &ContractParams, params: &HestonParams) -> Result<Quote, PricingError> {
        let call = self.seen.len();
        self.seen.push(*params);
        Ok((self.script)(call))
    }
}

// ============================================================================
// Black-Scholes Anchor
// ============================================================================

/// Test the anchor recovers the generating volatility.
#[test]
fn test_bs_anchor_round_trip() {
    let c = contract(100.0);
    let market = bs_price(&c, 0.20);
    let anchor = Calibrator::default().bs_anchor(market, &c).unwrap();
    assert_abs_diff_eq!(anchor, 0.20, epsilon = 1e-4);
}

// ============================================================================
// Search Policies (scripted pricer)
// ============================================================================

/// Test a first-candidate match short-circuits to the anchor.
#[test]
fn test_degenerate_first_candidate() {
    let c = contract(100.0);
    let market = bs_price(&c, 0.20);
    let mut pricer = ScriptedPricer::new(|_| fourier(market));

    let result = Calibrator::default().solve(&mut pricer, market, &c).unwrap();

    assert_eq!(pricer.seen.len(), 1);
    assert_eq!(result.evaluations, 1);
    assert_eq!(result.fallback, Some(FallbackReason::DegenerateMatch));
    assert_eq!(result.implied_vol, result.bs_anchor);
    assert_abs_diff_eq!(result.implied_vol, 0.20, epsilon = 1e-4);
    assert!(result.used_fallback());
}

/// Test the search stops at the first candidate within the early-exit ratio.
#[test]
fn test_early_exit() {
    let c = contract(100.0);
    let market = bs_price(&c, 0.20);
    // 0.012 is above the degenerate threshold and below 0.5% of ≈4.33
    let mut pricer = ScriptedPricer::new(|call| {
        if call < 2 {
            fourier(market + 0.5)
        } else {
            fourier(market + 0.012)
        }
    });

    let result = Calibrator::default().solve(&mut pricer, market, &c).unwrap();

    assert_eq!(result.evaluations, 3);
    assert_eq!(result.fallback, None);
    assert!(!result.used_fallback());
    assert_relative_eq!(result.best_price_diff, 0.012, epsilon = 1e-9);
    assert_eq!(result.best_params, pricer.seen[2]);
    // At the money the first v0 block is σ_BS²
    assert_relative_eq!(result.implied_vol, result.bs_anchor, epsilon = 1e-12);
}

/// Test a completely wrong model collapses to the anchor through the blend.
#[test]
fn test_poor_fit_with_zero_weight() {
    let c = contract(100.0);
    let market = bs_price(&c, 0.20);
    let mut pricer = ScriptedPricer::new(|_| fourier(2.0 * market));

    let result = Calibrator::default().solve(&mut pricer, market, &c).unwrap();

    assert_eq!(result.evaluations, 135);
    assert_eq!(
        result.fallback,
        Some(FallbackReason::PoorFit { blend_weight: 0.0 })
    );
    assert_eq!(result.implied_vol, result.bs_anchor);
}

/// Test partial blending between √v0* and the anchor.
#[test]
fn test_poor_fit_blend() {
    // F/K > 1.1, so the first candidate has v0 = 1.1·σ_BS²
    let c = contract(85.0);
    let market = bs_price(&c, 0.20);
    let mut pricer = ScriptedPricer::new(|_| fourier(1.2 * market));

    let result = Calibrator::default().solve(&mut pricer, market, &c).unwrap();
    let anchor = result.bs_anchor;

    match result.fallback {
        Some(FallbackReason::PoorFit { blend_weight }) => {
            assert_relative_eq!(blend_weight, 0.8, epsilon = 1e-9)
        }
        other => panic!("expected poor fit, got {:?}", other),
    }
    assert_eq!(result.best_params, pricer.seen[0]);
    let expected = 0.8 * (1.1_f64).sqrt() * anchor + 0.2 * anchor;
    assert_relative_eq!(result.implied_vol, expected, epsilon = 1e-9);
}

/// Test an estimate outside the bounds is replaced by the anchor.
#[test]
fn test_bounds_violation_prefers_anchor() {
    let c = contract(100.0);
    let market = bs_price(&c, 0.20);
    let config = CalibratorConfig {
        // Candidate v0 = 100·σ_BS² gives √v0 ≈ 2.0
        v0_multipliers: vec![100.0],
        ..CalibratorConfig::default()
    };
    let mut pricer = ScriptedPricer::new(|call| {
        if call == 0 {
            fourier(market + 0.5)
        } else {
            fourier(market + 0.001)
        }
    });

    let result = Calibrator::new(config)
        .unwrap()
        .solve(&mut pricer, market, &c)
        .unwrap();

    assert_eq!(result.evaluations, 2);
    match result.fallback {
        Some(FallbackReason::BoundsViolation { rejected }) => assert!(rejected > 1.5),
        other => panic!("expected bounds violation, got {:?}", other),
    }
    assert_eq!(result.implied_vol, result.bs_anchor);
}

/// Test Black-Scholes stand-in prices are skipped rather than matched.
#[test]
fn test_black_scholes_priced_candidates_are_skipped() {
    let c = contract(100.0);
    let market = bs_price(&c, 0.20);
    // The stand-in reproduces the market exactly, which must not count as
    // a degenerate match
    let mut pricer = ScriptedPricer::new(|call| {
        if call == 0 {
            black_scholes(market)
        } else {
            fourier(market + 0.012)
        }
    });

    let result = Calibrator::default().solve(&mut pricer, market, &c).unwrap();

    assert_eq!(result.evaluations, 2);
    assert_eq!(result.black_scholes_priced, 1);
    assert_eq!(result.fallback, None);
    assert_eq!(result.best_params, pricer.seen[1]);
    assert_relative_eq!(result.best_price_diff, 0.012, epsilon = 1e-9);
}

/// Test a search priced entirely by the stand-in records the FFT failure.
#[test]
fn test_all_black_scholes_priced_is_fourier_unavailable() {
    let c = contract(100.0);
    let market = bs_price(&c, 0.20);
    let mut pricer = ScriptedPricer::new(|_| black_scholes(market));

    let result = Calibrator::default().solve(&mut pricer, market, &c).unwrap();

    assert_eq!(result.evaluations, 135);
    assert_eq!(result.black_scholes_priced, 135);
    assert_eq!(
        result.fallback,
        Some(FallbackReason::FourierUnavailable { candidates: 135 })
    );
    assert_eq!(result.implied_vol, result.bs_anchor);
    assert_eq!(result.best_params, pricer.seen[0]);
}

/// Test pricer errors propagate unchanged.
#[test]
fn test_pricer_error_propagates() {
    struct Broken;
    impl CandidatePricer for Broken {
        fn price(&mut self, _: &ContractParams, _: &HestonParams) -> Result<Quote, PricingError> {
            Err(PricingError::NumericalInstability("broken".to_string()))
        }
    }

    let c = contract(100.0);
    let market = bs_price(&c, 0.20);
    let result = Calibrator::default().solve(&mut Broken, market, &c);
    assert!(matches!(result, Err(PricingError::NumericalInstability(_))));
}

// ============================================================================
// End-to-End Through the FFT Session
// ============================================================================

/// Test the documented example stays in bounds and reproduces its value.
#[test]
fn test_end_to_end_example() {
    let iv = price_implied_vol(5.0, 100.0, 100.0, 0.25, 0.05, 0.02, None).unwrap();

    assert!((0.05..=1.5).contains(&iv.value));
    assert!(!iv.challenging);
    assert_eq!(iv.calibration.black_scholes_priced, 0);
    assert_abs_diff_eq!(iv.calibration.bs_anchor, 0.233717, epsilon = 1e-4);
    assert_abs_diff_eq!(iv.value, 0.233717, epsilon = 1e-3);
}

/// Test the deep out-of-the-money, very short-dated contract.
#[test]
fn test_extreme_contract_is_challenging_and_finite() {
    let iv = price_implied_vol(5e-4, 100.0, 300.0, 0.02, 0.05, 0.02, None).unwrap();

    assert!(iv.challenging);
    assert!(iv.value.is_finite() && iv.value > 0.0);
    assert!(iv.used_fallback() || (0.05..=1.5).contains(&iv.value));
}

/// FFT engine that always fails recoverably.
#[derive(Default)]
struct FailingEngine {
    calls: usize,
}

impl FftEngine for FailingEngine {
    fn forward(&mut self, _: &mut [Complex64]) -> Result<(), PricingError> {
        self.calls += 1;
        Err(PricingError::NumericalInstability("injected".to_string()))
    }
}

/// Test an FFT that fails on every grid ends at the anchor with the
/// failure recorded.
#[test]
fn test_failing_engine_records_fourier_unavailable() {
    let mut session = PricingSession::with_engine(
        GridConfig::default(),
        SessionOptions::default(),
        FailingEngine::default(),
    )
    .unwrap();
    let c = contract(110.0);
    let market = 2.0;

    let iv = implied_vol_in_session(&mut session, &Calibrator::default(), market, &c).unwrap();

    let calibration = &iv.calibration;
    assert_eq!(
        calibration.fallback,
        Some(FallbackReason::FourierUnavailable { candidates: 135 })
    );
    assert_eq!(calibration.black_scholes_priced, 135);
    assert_eq!(iv.value, calibration.bs_anchor);
    assert!(iv.used_fallback());
    // Every candidate tried the primary grid and both presets
    assert_eq!(session.engine().calls, 3 * 135);
    assert_eq!(session.transform_runs(), 0);
}
