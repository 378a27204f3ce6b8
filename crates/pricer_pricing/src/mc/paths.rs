//! Path generation for Monte Carlo simulation.
//!
//! Geometric Brownian Motion is simulated exactly in log-space:
//!
//! ```text
//! ln S(t+dt) = ln S(t) + (r - 0.5σ²)dt + σ√dt × Z,   Z ~ N(0, 1)
//! ```
//!
//! # Memory Layout
//!
//! A path is a single `&mut [f64]` of length `n_steps` holding the prices at
//! `dt, 2dt, ..., T`. The initial spot is not stored.

use pricer_core::math::discount_factor;
use pricer_core::types::{ensure_finite, ensure_non_negative, ensure_positive, MarketParams, PricingError};

use crate::rng::PricerRng;

/// Parameters for Geometric Brownian Motion path generation.
///
/// # Model
///
/// The GBM model assumes asset prices follow:
/// ```text
/// dS = r S dt + σ S dW
/// ```
///
/// where:
/// - S is the spot price
/// - r is the risk-free rate (drift under the risk-neutral measure)
/// - σ is the volatility
/// - W is a Wiener process
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::GbmParams;
///
/// let params = GbmParams {
///     spot: 100.0,
///     rate: 0.05,
///     volatility: 0.2,
///     maturity: 1.0,
/// };
/// assert!(params.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GbmParams {
    /// Initial spot price (S₀).
    pub spot: f64,
    /// Risk-free rate (r) - annualised.
    pub rate: f64,
    /// Volatility (σ) - annualised.
    pub volatility: f64,
    /// Time to maturity (T) - in years.
    pub maturity: f64,
}

impl GbmParams {
    /// Creates new GBM parameters.
    ///
    /// # Arguments
    ///
    /// * `spot` - Initial spot price
    /// * `rate` - Risk-free rate (annualised)
    /// * `volatility` - Volatility (annualised)
    /// * `maturity` - Time to maturity (years)
    #[inline]
    pub fn new(spot: f64, rate: f64, volatility: f64, maturity: f64) -> Self {
        Self {
            spot,
            rate,
            volatility,
            maturity,
        }
    }

    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` naming the first field that
    /// is non-finite, or non-positive (spot, maturity), or negative
    /// (volatility).
    pub fn validate(&self) -> Result<(), PricingError> {
        ensure_positive("spot", self.spot)?;
        ensure_positive("maturity", self.maturity)?;
        ensure_finite("rate", self.rate)?;
        ensure_non_negative("volatility", self.volatility)?;
        Ok(())
    }

    /// Discount factor to maturity, `exp(-rT)`.
    #[inline]
    pub fn discount_factor(&self) -> f64 {
        discount_factor(self.rate, self.maturity)
    }
}

impl Default for GbmParams {
    fn default() -> Self {
        Self {
            spot: 100.0,
            rate: 0.05,
            volatility: 0.2,
            maturity: 1.0,
        }
    }
}

impl From<MarketParams> for GbmParams {
    fn from(market: MarketParams) -> Self {
        Self {
            spot: market.spot,
            rate: market.rate,
            volatility: market.volatility,
            maturity: market.maturity,
        }
    }
}

/// Per-step constants of the exact log-space GBM scheme.
///
/// Computed once per run and shared by every path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GbmStepper {
    log_spot: f64,
    drift_dt: f64,
    vol_sqrt_dt: f64,
}

impl GbmStepper {
    /// Precomputes `ln S₀`, `(r - 0.5σ²)dt` and `σ√dt` for `n_steps` steps.
    pub fn new(params: &GbmParams, n_steps: usize) -> Self {
        let dt = params.maturity / n_steps as f64;
        Self {
            log_spot: params.spot.ln(),
            drift_dt: (params.rate - 0.5 * params.volatility * params.volatility) * dt,
            vol_sqrt_dt: params.volatility * dt.sqrt(),
        }
    }

    /// Fills `path` with one simulated trajectory.
    ///
    /// One normal variate is drawn per element, in order.
    #[inline]
    pub fn fill_path(&self, rng: &mut PricerRng, path: &mut [f64]) {
        let mut log_price = self.log_spot;
        for price in path.iter_mut() {
            log_price += self.drift_dt + self.vol_sqrt_dt * rng.gen_normal();
            *price = log_price.exp();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gbm_params_validation() {
        assert!(GbmParams::default().validate().is_ok());
        assert!(GbmParams::new(100.0, -0.01, 0.0, 1.0).validate().is_ok());

        let cases = [
            (GbmParams::new(0.0, 0.05, 0.2, 1.0), "spot"),
            (GbmParams::new(100.0, 0.05, 0.2, 0.0), "maturity"),
            (GbmParams::new(100.0, f64::NAN, 0.2, 1.0), "rate"),
            (GbmParams::new(100.0, 0.05, -0.1, 1.0), "volatility"),
            (GbmParams::new(f64::INFINITY, 0.05, 0.2, 1.0), "spot"),
        ];
        for (params, field) in cases {
            assert_eq!(params.validate().unwrap_err().field(), Some(field));
        }
    }

    #[test]
    fn test_from_market_params() {
        let market = MarketParams::new(90.0, 110.0, 2.0, 0.03, 0.25).unwrap();
        let gbm = GbmParams::from(market);
        assert_eq!(gbm, GbmParams::new(90.0, 0.03, 0.25, 2.0));
    }

    #[test]
    fn test_zero_volatility_path_is_deterministic_forward() {
        let params = GbmParams::new(100.0, 0.05, 0.0, 1.0);
        let stepper = GbmStepper::new(&params, 4);
        let mut rng = PricerRng::from_seed(1);
        let mut path = [0.0; 4];
        stepper.fill_path(&mut rng, &mut path);

        for (i, price) in path.iter().enumerate() {
            let t = (i + 1) as f64 * 0.25;
            assert_relative_eq!(*price, 100.0 * (0.05 * t).exp(), epsilon = 1e-10);
        }
    }

    #[test]
    fn test_paths_are_positive_and_reproducible() {
        let params = GbmParams::new(100.0, 0.05, 0.8, 1.0);
        let stepper = GbmStepper::new(&params, 64);

        let mut a = vec![0.0; 64];
        let mut b = vec![0.0; 64];
        stepper.fill_path(&mut PricerRng::from_seed(9), &mut a);
        stepper.fill_path(&mut PricerRng::from_seed(9), &mut b);

        assert_eq!(a, b);
        assert!(a.iter().all(|&s| s > 0.0 && s.is_finite()));
    }

    #[test]
    fn test_terminal_mean_matches_forward() {
        let params = GbmParams::default();
        let stepper = GbmStepper::new(&params, 1);
        let mut rng = PricerRng::from_seed(3);
        let mut path = [0.0; 1];

        let n = 200_000;
        let mut total = 0.0;
        for _ in 0..n {
            stepper.fill_path(&mut rng, &mut path);
            total += path[0];
        }
        let mean = total / n as f64;
        // E[S_T] = 105.127, SE ≈ 21/√n ≈ 0.047
        assert!((mean - 100.0 * 0.05_f64.exp()).abs() < 0.25, "mean = {}", mean);
    }
}
