//! Monte Carlo pricing result.

use pricer_core::math::{SampleStatistics, Z_95};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Point estimate with its 95% confidence interval.
///
/// `ci_low = estimate - 1.96·std_error` and `ci_high = estimate + 1.96·std_error`.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::MonteCarloResult;
///
/// let result = MonteCarloResult {
///     estimate: 10.5,
///     std_error: 0.05,
///     ci_low: 10.402,
///     ci_high: 10.598,
///     n_paths: 100_000,
///     seed: 42,
/// };
///
/// println!("Price: {} +/- {}", result.estimate, result.half_width());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonteCarloResult {
    /// Mean discounted payoff.
    pub estimate: f64,
    /// Standard error of the mean (0 for a single path).
    pub std_error: f64,
    /// Lower bound of the 95% confidence interval.
    pub ci_low: f64,
    /// Upper bound of the 95% confidence interval.
    pub ci_high: f64,
    /// Number of simulated paths.
    pub n_paths: usize,
    /// Master seed used for the run (drawn from entropy when none was given).
    pub seed: u64,
}

impl MonteCarloResult {
    /// Builds the result from discounted payoff statistics.
    pub(crate) fn from_statistics(stats: &SampleStatistics, seed: u64) -> Self {
        let (ci_low, ci_high) = stats.confidence_interval(Z_95);
        Self {
            estimate: stats.mean(),
            std_error: stats.std_error(),
            ci_low,
            ci_high,
            n_paths: stats.count(),
            seed,
        }
    }

    /// Returns the 95% confidence interval half-width.
    #[inline]
    pub fn half_width(&self) -> f64 {
        Z_95 * self.std_error
    }

    /// Returns true if `value` lies inside the confidence interval.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.ci_low <= value && value <= self.ci_high
    }
}
