//! Property tests for the binomial tree pricer.
//!
//! # Test Categories
//!
//! 1. **Put-call parity**: European call - put = S - K·exp(-rT)
//! 2. **Early exercise**: American >= European, equal for calls without dividends
//! 3. **Convergence**: tree prices settle on the Black-Scholes value

use approx::assert_relative_eq;
use pricer_core::types::OptionKind;
use pricer_pricing::binomial_price;
use proptest::prelude::*;

/// Black-Scholes price of the standard at-the-money call
/// (S=100, K=100, T=1, r=5%, σ=20%).
const BS_STANDARD_CALL: f64 = 10.450_584;

fn standard(steps: usize, kind: OptionKind, american: bool) -> f64 {
    binomial_price(100.0, 100.0, 1.0, 0.05, 0.2, steps, kind, american).unwrap()
}

// ============================================================================
// Convergence
// ============================================================================

#[test]
fn test_convergence_to_black_scholes() {
    let p500 = standard(500, OptionKind::Call, false);
    let p1000 = standard(1000, OptionKind::Call, false);

    assert!((p500 - p1000).abs() < 0.01, "N=500 {} vs N=1000 {}", p500, p1000);
    assert!((p1000 - BS_STANDARD_CALL).abs() < 0.01, "N=1000 {}", p1000);
}

/// CRR error is O(1/N): the coarse tree is noticeably further from the limit.
#[test]
fn test_error_shrinks_with_steps() {
    let coarse = (standard(50, OptionKind::Call, false) - BS_STANDARD_CALL).abs();
    let fine = (standard(1000, OptionKind::Call, false) - BS_STANDARD_CALL).abs();
    assert!(fine < coarse);
}

#[test]
fn test_american_put_converges() {
    let p500 = standard(500, OptionKind::Put, true);
    let p1000 = standard(1000, OptionKind::Put, true);
    assert!((p500 - p1000).abs() < 0.01);
    assert!(p1000 > 6.0 && p1000 < 6.2, "American put {}", p1000);
}

// ============================================================================
// Degenerate volatility
// ============================================================================

#[test]
fn test_zero_volatility_matches_discounted_forward() {
    for &(kind, strike) in &[(OptionKind::Call, 90.0), (OptionKind::Put, 120.0)] {
        let price = binomial_price(100.0, strike, 1.5, 0.04, 0.0, 25, kind, false).unwrap();
        let forward = 100.0 * (0.04_f64 * 1.5).exp();
        let expected = (-0.04_f64 * 1.5).exp() * kind.intrinsic(forward, strike);
        assert_relative_eq!(price, expected, epsilon = 1e-12);
    }
}

// ============================================================================
// Properties over random parameters
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_put_call_parity(
        spot in 50.0_f64..150.0,
        strike in 50.0_f64..150.0,
        maturity in 0.1_f64..3.0,
        rate in -0.02_f64..0.1,
        volatility in 0.05_f64..0.6,
        steps in 1_usize..150,
    ) {
        let call = binomial_price(spot, strike, maturity, rate, volatility, steps, OptionKind::Call, false).unwrap();
        let put = binomial_price(spot, strike, maturity, rate, volatility, steps, OptionKind::Put, false).unwrap();
        let parity = spot - strike * (-rate * maturity).exp();

        prop_assert!((call - put - parity).abs() < 1e-8 * spot.max(strike));
    }

    // Ranges keep r·√Δt below σ so the risk-neutral probability stays in [0, 1].
    #[test]
    fn prop_american_at_least_european(
        spot in 50.0_f64..150.0,
        strike in 50.0_f64..150.0,
        maturity in 0.1_f64..2.0,
        rate in -0.02_f64..0.1,
        volatility in 0.2_f64..0.6,
        steps in 1_usize..150,
        is_call in any::<bool>(),
    ) {
        let kind = if is_call { OptionKind::Call } else { OptionKind::Put };
        let european = binomial_price(spot, strike, maturity, rate, volatility, steps, kind, false).unwrap();
        let american = binomial_price(spot, strike, maturity, rate, volatility, steps, kind, true).unwrap();

        prop_assert!(american >= european - 1e-12);
        prop_assert!(american >= kind.intrinsic(spot, strike) - 1e-12);
    }

    #[test]
    fn prop_american_call_without_dividends_is_european(
        spot in 50.0_f64..150.0,
        strike in 50.0_f64..150.0,
        rate in 0.0_f64..0.1,
        volatility in 0.15_f64..0.6,
        steps in 1_usize..150,
    ) {
        let european = binomial_price(spot, strike, 1.0, rate, volatility, steps, OptionKind::Call, false).unwrap();
        let american = binomial_price(spot, strike, 1.0, rate, volatility, steps, OptionKind::Call, true).unwrap();

        prop_assert!((american - european).abs() < 1e-9 * spot.max(strike));
    }
}
