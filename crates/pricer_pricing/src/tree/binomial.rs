//! Cox-Ross-Rubinstein binomial tree pricer.
//!
//! Backward induction over a recombining lattice with optional early
//! exercise. The nodes of the current step live in a single buffer that is
//! overwritten in place, giving O(N²) time and O(N) memory.
//!
//! # Algorithm
//!
//! 1. Derive Δt, u = exp(σ√Δt), d = 1/u and p = (exp(rΔt) - d)/(u - d)
//! 2. Terminal payoffs at S·u^j·d^(N-j), j = 0..N
//! 3. For each step from N-1 down to 0:
//!    `V = exp(-rΔt)·(p·V_up + (1-p)·V_down)`, and for American exercise
//!    `V = max(V, intrinsic)`
//! 4. The root value is the price
//!
//! # Zero Volatility
//!
//! With σ = 0 the lattice collapses onto the deterministic forward curve
//! `S·exp(rt)`. A European option is worth `exp(-rT)·payoff(S·exp(rT))`; an
//! American option takes the best discounted intrinsic value over the
//! collapsed nodes.
//!
//! # Probability Range
//!
//! `p` is not clamped. Coarse steps combined with a large rate relative to
//! volatility can push it outside [0, 1]; the price is still computed with the
//! classical formula and a warning is logged.
//!
//! # Lattice Range
//!
//! The outermost terminal nodes sit at `S·exp(±σ√(T·N))`. When either leaves
//! the normal `f64` range the lattice cannot represent its own nodes, so the
//! request is rejected instead of pricing on overflowed or zeroed spots.

use pricer_core::math::CrrFactors;
use pricer_core::types::{ensure_count, ExerciseStyle, MarketParams, OptionKind, PricingError};
use tracing::{debug, warn};

/// Maximum number of lattice steps allowed.
pub const MAX_TREE_STEPS: usize = 100_000;

/// Lattice configuration.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::{ExerciseStyle, OptionKind};
/// use pricer_pricing::tree::LatticeConfig;
///
/// let config = LatticeConfig::new(200, OptionKind::Put, ExerciseStyle::American);
/// assert_eq!(config.steps, 200);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LatticeConfig {
    /// Number of time steps N.
    pub steps: usize,
    /// Call or put (the tree always evaluates this fixed intrinsic payoff).
    pub kind: OptionKind,
    /// European or American exercise.
    pub style: ExerciseStyle,
}

impl LatticeConfig {
    /// Creates a lattice configuration.
    #[inline]
    pub fn new(steps: usize, kind: OptionKind, style: ExerciseStyle) -> Self {
        Self { steps, kind, style }
    }

    /// Validates the step count.
    pub fn validate(&self) -> Result<(), PricingError> {
        ensure_count("steps", self.steps, MAX_TREE_STEPS)
    }
}

/// Binomial tree pricer.
///
/// Stateless: the lattice buffer is allocated per call and dropped once the
/// root value is known.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::{ExerciseStyle, MarketParams, OptionKind};
/// use pricer_pricing::tree::{BinomialTreePricer, LatticeConfig};
///
/// let market = MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap();
/// let pricer = BinomialTreePricer::new(LatticeConfig::new(
///     500,
///     OptionKind::Call,
///     ExerciseStyle::European,
/// ));
///
/// let price = pricer.price(&market).unwrap();
/// assert!((price - 10.4506).abs() < 0.01);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct BinomialTreePricer {
    config: LatticeConfig,
}

impl BinomialTreePricer {
    /// Creates a pricer for the given lattice configuration.
    #[inline]
    pub fn new(config: LatticeConfig) -> Self {
        Self { config }
    }

    /// Returns the lattice configuration.
    #[inline]
    pub fn config(&self) -> &LatticeConfig {
        &self.config
    }

    /// Prices the option.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` if the market parameters or
    /// the step count are invalid. No lattice work is done in that case.
    pub fn price(&self, market: &MarketParams) -> Result<f64, PricingError> {
        market.validate()?;
        self.config.validate()?;

        let LatticeConfig { steps, kind, style } = self.config;
        let factors = CrrFactors::new(market.maturity, market.rate, market.volatility, steps);

        let price = if factors.is_degenerate() {
            collapsed_price(market, kind, style, steps)
        } else {
            if !factors.has_valid_probability() {
                warn!(
                    probability = factors.probability,
                    steps,
                    rate = market.rate,
                    volatility = market.volatility,
                    "risk-neutral probability outside [0, 1]; pricing with unclamped value"
                );
            }
            ensure_representable(market, steps, &factors)?;
            backward_induction(market, kind, style, steps, &factors)
        };

        debug!(steps, %kind, %style, price, "binomial tree priced");
        Ok(price)
    }
}

/// Fails when the extreme terminal node prices are not normal floats.
fn ensure_representable(
    market: &MarketParams,
    steps: usize,
    factors: &CrrFactors,
) -> Result<(), PricingError> {
    let log_span = steps as f64 * factors.up.ln();
    let top = market.spot * log_span.exp();
    let bottom = market.spot * (-log_span).exp();
    if top.is_finite() && bottom >= f64::MIN_POSITIVE {
        return Ok(());
    }
    Err(PricingError::invalid(
        "steps",
        format!(
            "lattice spans spot·exp(±{:.1}); terminal node prices leave the f64 range, use fewer steps",
            log_span
        ),
    ))
}

/// Backward induction over the CRR lattice.
fn backward_induction(
    market: &MarketParams,
    kind: OptionKind,
    style: ExerciseStyle,
    steps: usize,
    factors: &CrrFactors,
) -> f64 {
    let strike = market.strike;
    let up_squared = factors.up * factors.up;
    let discounted_up = factors.step_discount * factors.probability;
    let discounted_down = factors.step_discount * (1.0 - factors.probability);
    let american = style.is_american();

    // Node j of step i sits at S·d^i·u^(2j), i.e. S·u^j·d^(i-j).
    let lowest_node = |step: usize| market.spot * factors.down.powi(step as i32);

    let mut values = Vec::with_capacity(steps + 1);
    let mut node_spot = lowest_node(steps);
    for _ in 0..=steps {
        values.push(kind.intrinsic(node_spot, strike));
        node_spot *= up_squared;
    }

    for step in (0..steps).rev() {
        let mut node_spot = lowest_node(step);
        for j in 0..=step {
            let continuation = discounted_up * values[j + 1] + discounted_down * values[j];
            values[j] = if american {
                continuation.max(kind.intrinsic(node_spot, strike))
            } else {
                continuation
            };
            node_spot *= up_squared;
        }
    }

    values[0]
}

/// Value on the lattice collapsed by zero volatility.
fn collapsed_price(
    market: &MarketParams,
    kind: OptionKind,
    style: ExerciseStyle,
    steps: usize,
) -> f64 {
    let discounted_payoff = |t: f64| {
        let forward = market.spot * (market.rate * t).exp();
        (-market.rate * t).exp() * kind.intrinsic(forward, market.strike)
    };

    let at_maturity = discounted_payoff(market.maturity);
    if !style.is_american() {
        return at_maturity;
    }

    let dt = market.maturity / steps as f64;
    (0..steps)
        .map(|i| discounted_payoff(i as f64 * dt))
        .fold(at_maturity, f64::max)
}

/// Prices an option on a CRR binomial tree.
///
/// Flat form of [`BinomialTreePricer::price`].
///
/// # Arguments
///
/// * `spot` - Current underlying price (> 0)
/// * `strike` - Strike price (> 0)
/// * `maturity` - Time to maturity in years (> 0)
/// * `rate` - Continuously compounded risk-free rate
/// * `volatility` - Annualised volatility (>= 0)
/// * `steps` - Number of lattice steps (>= 1)
/// * `option_kind` - Call or put
/// * `american` - Whether early exercise is allowed
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::OptionKind;
/// use pricer_pricing::binomial_price;
///
/// let european = binomial_price(100.0, 100.0, 1.0, 0.05, 0.2, 200, OptionKind::Put, false).unwrap();
/// let american = binomial_price(100.0, 100.0, 1.0, 0.05, 0.2, 200, OptionKind::Put, true).unwrap();
/// assert!(american > european);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn binomial_price(
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    volatility: f64,
    steps: usize,
    option_kind: OptionKind,
    american: bool,
) -> Result<f64, PricingError> {
    let market = MarketParams {
        spot,
        strike,
        maturity,
        rate,
        volatility,
    };
    let config = LatticeConfig::new(steps, option_kind, ExerciseStyle::from_american(american));
    BinomialTreePricer::new(config).price(&market)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn standard(steps: usize, kind: OptionKind, american: bool) -> f64 {
        binomial_price(100.0, 100.0, 1.0, 0.05, 0.2, steps, kind, american).unwrap()
    }

    #[test]
    fn test_one_step_tree_by_hand() {
        let (s, k, r, sigma): (f64, f64, f64, f64) = (100.0_f64, 100.0, 0.05, 0.2);
        let u = sigma.exp();
        let d = 1.0 / u;
        let p = (r.exp() - d) / (u - d);
        let expected = (-r).exp() * (p * (s * u - k).max(0.0) + (1.0 - p) * (s * d - k).max(0.0));

        let price = binomial_price(s, k, 1.0, r, sigma, 1, OptionKind::Call, false).unwrap();
        assert_relative_eq!(price, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_reference_values() {
        assert_relative_eq!(standard(100, OptionKind::Call, false), 10.430612, epsilon = 1e-5);
        assert_relative_eq!(standard(100, OptionKind::Put, false), 5.553554, epsilon = 1e-5);
        assert_relative_eq!(standard(100, OptionKind::Put, true), 6.082354, epsilon = 1e-5);
    }

    #[test]
    fn test_american_call_equals_european_without_dividends() {
        let european = standard(150, OptionKind::Call, false);
        let american = standard(150, OptionKind::Call, true);
        assert_relative_eq!(american, european, epsilon = 1e-10);
    }

    #[test]
    fn test_deep_itm_american_put_is_at_least_intrinsic() {
        let price = binomial_price(60.0, 100.0, 1.0, 0.05, 0.2, 200, OptionKind::Put, true).unwrap();
        assert!(price >= 40.0 - 1e-12);
    }

    #[test]
    fn test_zero_volatility_european() {
        let (s, k, t, r): (f64, f64, f64, f64) = (100.0_f64, 95.0, 2.0, 0.03);
        let expected = (-r * t).exp() * (s * (r * t).exp() - k).max(0.0);

        let call = binomial_price(s, k, t, r, 0.0, 50, OptionKind::Call, false).unwrap();
        assert_relative_eq!(call, expected, epsilon = 1e-12);

        let put = binomial_price(s, k, t, r, 0.0, 50, OptionKind::Put, false).unwrap();
        assert_eq!(put, 0.0);
    }

    #[test]
    fn test_zero_volatility_american_put_exercises_now() {
        let price = binomial_price(90.0, 100.0, 1.0, 0.05, 0.0, 10, OptionKind::Put, true).unwrap();
        assert_relative_eq!(price, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_probability_outside_unit_interval_is_not_clamped() {
        // u = e^0.01, growth = e^0.5: p ≈ 32.9
        let price = binomial_price(100.0, 100.0, 1.0, 0.5, 0.01, 1, OptionKind::Call, false).unwrap();
        let f = CrrFactors::new(1.0, 0.5, 0.01, 1);
        let expected = f.step_discount * f.probability * (100.0 * f.up - 100.0);
        assert_relative_eq!(price, expected, epsilon = 1e-10);
    }

    #[test]
    fn test_invalid_inputs_name_the_field() {
        let cases = [
            (binomial_price(0.0, 100.0, 1.0, 0.05, 0.2, 10, OptionKind::Call, false), "spot"),
            (binomial_price(100.0, 0.0, 1.0, 0.05, 0.2, 10, OptionKind::Call, false), "strike"),
            (binomial_price(100.0, 100.0, -1.0, 0.05, 0.2, 10, OptionKind::Call, false), "maturity"),
            (binomial_price(100.0, 100.0, 1.0, 0.05, -0.1, 10, OptionKind::Call, false), "volatility"),
            (binomial_price(100.0, 100.0, 1.0, 0.05, 0.2, 0, OptionKind::Call, false), "steps"),
        ];

        for (result, field) in cases {
            assert_eq!(result.unwrap_err().field(), Some(field));
        }
    }

    #[test]
    fn test_wide_lattice_keeps_put_call_parity() {
        // σ√(T·N) = 400: nodes span roughly 1e-172 to 1e176
        let (s, k, t, r, sigma, n) = (100.0_f64, 100.0, 16.0, 0.02, 1.0, 10_000);
        let call = binomial_price(s, k, t, r, sigma, n, OptionKind::Call, false).unwrap();
        let put = binomial_price(s, k, t, r, sigma, n, OptionKind::Put, false).unwrap();
        assert!(call > 0.0 && call < s);
        assert_relative_eq!(call - put, s - k * (-r * t).exp(), epsilon = 1e-6);
    }

    #[test]
    fn test_lattice_outside_float_range_is_rejected() {
        // σ√(T·N) ≈ 2324: d^N underflows and u^N overflows
        for american in [false, true] {
            for kind in [OptionKind::Call, OptionKind::Put] {
                let err = binomial_price(100.0, 100.0, 30.0, 0.0, 3.0, 20_000, kind, american)
                    .unwrap_err();
                assert_eq!(err.field(), Some("steps"));
                assert!(err.to_string().contains("f64 range"));
            }
        }
        assert!(binomial_price(100.0, 100.0, 30.0, 0.0, 3.0, 1_000, OptionKind::Call, false).is_ok());
    }

    #[test]
    fn test_pricer_exposes_config() {
        let config = LatticeConfig::new(10, OptionKind::Put, ExerciseStyle::American);
        assert_eq!(BinomialTreePricer::new(config).config(), &config);
    }
}
