//! Monte Carlo pricing engine.
//!
//! # Overview
//!
//! The [`MonteCarloPricer`] coordinates:
//! 1. Random number generation (via [`PricerRng`])
//! 2. Path generation (via [`GbmStepper`])
//! 3. Payoff evaluation (any [`PathPayoff`])
//! 4. Discounting and aggregation into [`SampleStatistics`]
//!
//! # Path Blocks
//!
//! Trials are partitioned into blocks of [`PATH_BLOCK`] consecutive paths.
//! Block `b` draws from its own generator, `PricerRng::for_stream(seed, b)`,
//! and reduces into its own accumulator. Accumulators are merged in block
//! order, so the estimate depends only on the seed and the parameters, not
//! on whether the blocks ran sequentially or on the rayon pool.

use pricer_core::math::SampleStatistics;
use pricer_core::traits::PathPayoff;
use pricer_core::types::PricingError;
use rayon::prelude::*;
use tracing::debug;

use super::config::MonteCarloConfig;
use super::error::NonFinitePayoff;
use super::paths::{GbmParams, GbmStepper};
use super::result::MonteCarloResult;
use crate::rng::{entropy_seed, PricerRng};

/// Number of consecutive trials simulated from one generator stream.
pub const PATH_BLOCK: usize = 4096;

/// Monte Carlo pricing engine.
///
/// Holds only the validated configuration; every call to
/// [`price`](Self::price) is independent.
///
/// # Examples
///
/// ```rust
/// use pricer_core::traits::ArithmeticAsianPayoff;
/// use pricer_pricing::mc::{GbmParams, MonteCarloConfig, MonteCarloPricer};
///
/// let config = MonteCarloConfig::builder()
///     .n_paths(10_000)
///     .n_steps(52)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let pricer = MonteCarloPricer::new(config);
/// let result = pricer
///     .price(&ArithmeticAsianPayoff::call(100.0), &GbmParams::default())
///     .unwrap();
///
/// assert!(result.ci_low < result.estimate && result.estimate < result.ci_high);
/// println!("Price: {} +/- {}", result.estimate, result.half_width());
/// ```
#[derive(Clone, Debug)]
pub struct MonteCarloPricer {
    config: MonteCarloConfig,
}

impl MonteCarloPricer {
    /// Creates a new pricer with the given configuration.
    #[inline]
    pub fn new(config: MonteCarloConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Prices `payoff` under GBM dynamics.
    ///
    /// # Errors
    ///
    /// - `PricingError::InvalidParameter` if `gbm` is invalid; the payoff is
    ///   never called in that case
    /// - `PricingError::PayoffEvaluation` for the lowest-index trial whose
    ///   payoff failed or was not finite
    pub fn price<P>(&self, payoff: &P, gbm: &GbmParams) -> Result<MonteCarloResult, PricingError>
    where
        P: PathPayoff + ?Sized,
    {
        gbm.validate()?;
        self.config.validate()?;

        let n_paths = self.config.n_paths();
        let n_steps = self.config.n_steps();
        let seed = self.config.seed().unwrap_or_else(entropy_seed);
        let n_blocks = n_paths.div_ceil(PATH_BLOCK);

        let block = BlockRunner {
            payoff,
            stepper: GbmStepper::new(gbm, n_steps),
            discount: gbm.discount_factor(),
            seed,
            n_paths,
            n_steps,
        };

        let stats = if self.config.parallel() {
            // Collected in block order; the first error wins.
            let blocks: Vec<Result<SampleStatistics, PricingError>> = (0..n_blocks)
                .into_par_iter()
                .map(|b| block.run(b))
                .collect();
            blocks
                .into_iter()
                .try_fold(SampleStatistics::new(), merge_block)?
        } else {
            (0..n_blocks)
                .map(|b| block.run(b))
                .try_fold(SampleStatistics::new(), merge_block)?
        };

        let result = MonteCarloResult::from_statistics(&stats, seed);
        debug!(
            n_paths,
            n_steps,
            seed,
            parallel = self.config.parallel(),
            estimate = result.estimate,
            std_error = result.std_error,
            "monte carlo run complete"
        );
        Ok(result)
    }
}

fn merge_block(
    mut total: SampleStatistics,
    block: Result<SampleStatistics, PricingError>,
) -> Result<SampleStatistics, PricingError> {
    total.merge(&block?);
    Ok(total)
}

/// Shared, read-only state for simulating one block of trials.
struct BlockRunner<'a, P: ?Sized> {
    payoff: &'a P,
    stepper: GbmStepper,
    discount: f64,
    seed: u64,
    n_paths: usize,
    n_steps: usize,
}

impl<P> BlockRunner<'_, P>
where
    P: PathPayoff + ?Sized,
{
    fn run(&self, block: usize) -> Result<SampleStatistics, PricingError> {
        let first = block * PATH_BLOCK;
        let last = (first + PATH_BLOCK).min(self.n_paths);

        let mut rng = PricerRng::for_stream(self.seed, block as u64);
        let mut path = vec![0.0; self.n_steps];
        let mut stats = SampleStatistics::new();

        for trial in first..last {
            self.stepper.fill_path(&mut rng, &mut path);
            let value = self
                .payoff
                .evaluate(&path)
                .map_err(|source| PricingError::PayoffEvaluation { trial, source })?;
            if !value.is_finite() {
                return Err(PricingError::PayoffEvaluation {
                    trial,
                    source: Box::new(NonFinitePayoff { value }),
                });
            }
            stats.push(self.discount * value);
        }

        Ok(stats)
    }
}

/// Prices a path-dependent payoff by Monte Carlo simulation under GBM.
///
/// Flat form of [`MonteCarloPricer::price`]; runs sequentially.
///
/// # Arguments
///
/// * `payoff` - Payoff evaluated on each simulated path
/// * `spot` - Initial spot price (> 0)
/// * `maturity` - Time to maturity in years (> 0)
/// * `rate` - Continuously compounded risk-free rate
/// * `volatility` - Annualised volatility (>= 0)
/// * `steps` - Time steps per path (>= 1)
/// * `paths` - Number of simulated paths (>= 1)
/// * `seed` - `Some` for a reproducible run, `None` to draw a seed from entropy
///
/// # Examples
///
/// ```rust
/// use pricer_core::traits::VanillaPayoff;
/// use pricer_pricing::monte_carlo_price;
///
/// let call = VanillaPayoff::call(100.0);
/// let a = monte_carlo_price(&call, 100.0, 1.0, 0.05, 0.2, 1, 10_000, Some(7)).unwrap();
/// let b = monte_carlo_price(&call, 100.0, 1.0, 0.05, 0.2, 1, 10_000, Some(7)).unwrap();
/// assert_eq!(a, b);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn monte_carlo_price<P>(
    payoff: &P,
    spot: f64,
    maturity: f64,
    rate: f64,
    volatility: f64,
    steps: usize,
    paths: usize,
    seed: Option<u64>,
) -> Result<MonteCarloResult, PricingError>
where
    P: PathPayoff + ?Sized,
{
    let gbm = GbmParams::new(spot, rate, volatility, maturity);
    gbm.validate()?;

    let config = MonteCarloConfig::builder()
        .n_paths(paths)
        .n_steps(steps)
        .maybe_seed(seed)
        .build()?;

    MonteCarloPricer::new(config).price(payoff, &gbm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::traits::{from_fn, VanillaPayoff};
    use pricer_core::types::PayoffFailure;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn config(n_paths: usize, n_steps: usize, seed: u64) -> MonteCarloConfig {
        MonteCarloConfig::builder()
            .n_paths(n_paths)
            .n_steps(n_steps)
            .seed(seed)
            .build()
            .unwrap()
    }

    #[test]
    fn test_path_length_equals_steps() {
        let seen = AtomicUsize::new(0);
        let payoff = from_fn(|path: &[f64]| {
            seen.store(path.len(), Ordering::Relaxed);
            0.0
        });

        MonteCarloPricer::new(config(3, 17, 1))
            .price(&payoff, &GbmParams::default())
            .unwrap();
        assert_eq!(seen.load(Ordering::Relaxed), 17);
    }

    #[test]
    fn test_constant_payoff_is_discounted_exactly() {
        let payoff = from_fn(|_: &[f64]| 10.0);
        let result = MonteCarloPricer::new(config(1000, 4, 2))
            .price(&payoff, &GbmParams::default())
            .unwrap();

        assert_relative_eq!(result.estimate, 10.0 * (-0.05_f64).exp(), epsilon = 1e-12);
        assert!(result.std_error < 1e-12);
    }

    #[test]
    fn test_single_path_has_zero_std_error() {
        let result = MonteCarloPricer::new(config(1, 10, 3))
            .price(&VanillaPayoff::call(100.0), &GbmParams::default())
            .unwrap();

        assert_eq!(result.n_paths, 1);
        assert_eq!(result.std_error, 0.0);
        assert_eq!(result.ci_low, result.estimate);
        assert_eq!(result.ci_high, result.estimate);
    }

    #[test]
    fn test_zero_volatility_prices_forward_payoff() {
        let gbm = GbmParams::new(100.0, 0.05, 0.0, 1.0);
        let result = MonteCarloPricer::new(config(500, 12, 4))
            .price(&VanillaPayoff::call(95.0), &gbm)
            .unwrap();

        let expected = (-0.05_f64).exp() * (100.0 * 0.05_f64.exp() - 95.0);
        assert_relative_eq!(result.estimate, expected, epsilon = 1e-9);
        assert!(result.std_error < 1e-9);
    }

    #[test]
    fn test_failure_reports_global_trial_index() {
        let calls = AtomicUsize::new(0);
        let payoff = |_: &[f64]| -> Result<f64, PayoffFailure> {
            let n = calls.fetch_add(1, Ordering::Relaxed);
            if n == PATH_BLOCK + 5 {
                Err("boom".into())
            } else {
                Ok(1.0)
            }
        };

        let err = MonteCarloPricer::new(config(3 * PATH_BLOCK, 2, 5))
            .price(&payoff, &GbmParams::default())
            .unwrap_err();

        assert_eq!(err.trial(), Some(PATH_BLOCK + 5));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_non_finite_payoff_is_a_failure() {
        let payoff = from_fn(|path: &[f64]| if path[0] > 0.0 { f64::NAN } else { 0.0 });
        let err = MonteCarloPricer::new(config(10, 1, 6))
            .price(&payoff, &GbmParams::default())
            .unwrap_err();

        assert_eq!(err.trial(), Some(0));
        assert!(err.to_string().contains("non-finite"));
    }

    #[test]
    fn test_parallel_failure_is_lowest_trial() {
        let payoff = |path: &[f64]| -> Result<f64, PayoffFailure> {
            // Rare failures scattered across blocks.
            if path[0] > 180.0 {
                Err("threshold".into())
            } else {
                Ok(0.0)
            }
        };
        let gbm = GbmParams::default();
        let sequential = MonteCarloPricer::new(config(4 * PATH_BLOCK, 1, 8))
            .price(&payoff, &gbm)
            .unwrap_err();

        let parallel_config = MonteCarloConfig::builder()
            .n_paths(4 * PATH_BLOCK)
            .n_steps(1)
            .seed(8)
            .parallel(true)
            .build()
            .unwrap();
        let parallel = MonteCarloPricer::new(parallel_config)
            .price(&payoff, &gbm)
            .unwrap_err();

        assert_eq!(sequential.trial(), parallel.trial());
    }

    #[test]
    fn test_unseeded_run_records_its_seed() {
        let unseeded = MonteCarloConfig::builder()
            .n_paths(2000)
            .n_steps(1)
            .build()
            .unwrap();
        let result = MonteCarloPricer::new(unseeded)
            .price(&VanillaPayoff::call(100.0), &GbmParams::default())
            .unwrap();

        let replay = MonteCarloPricer::new(config(2000, 1, result.seed))
            .price(&VanillaPayoff::call(100.0), &GbmParams::default())
            .unwrap();
        assert_eq!(result, replay);
    }

    #[test]
    fn test_flat_function_validates_before_simulating() {
        let calls = AtomicUsize::new(0);
        let payoff = from_fn(|_: &[f64]| {
            calls.fetch_add(1, Ordering::Relaxed);
            0.0
        });

        let err = monte_carlo_price(&payoff, 100.0, 1.0, 0.05, 0.2, 10, 0, Some(1)).unwrap_err();
        assert_eq!(err.field(), Some("paths"));
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }
}
