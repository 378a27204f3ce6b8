//! Streaming sample statistics for Monte Carlo estimators.
//!
//! [`SampleStatistics`] accumulates count, mean and the sum of squared
//! deviations (Welford's update). Two accumulators can be combined with
//! [`SampleStatistics::merge`] (Chan et al. pairwise update), so partial
//! results from independent blocks of paths reduce into one estimate
//! without revisiting the samples.

use serde::{Deserialize, Serialize};

/// Two-sided 95% quantile of the standard normal distribution.
pub const Z_95: f64 = 1.96;

/// Running mean and variance of a stream of samples.
///
/// # Examples
/// ```
/// use pricer_core::math::SampleStatistics;
///
/// let stats: SampleStatistics = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]
///     .into_iter()
///     .collect();
/// assert_eq!(stats.count(), 8);
/// assert!((stats.mean() - 5.0).abs() < 1e-12);
/// assert!((stats.variance() - 32.0 / 7.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleStatistics {
    count: usize,
    mean: f64,
    m2: f64,
}

impl SampleStatistics {
    /// Creates an empty accumulator.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one sample.
    #[inline]
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Folds another accumulator into this one.
    pub fn merge(&mut self, other: &SampleStatistics) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }

        let n_a = self.count as f64;
        let n_b = other.count as f64;
        let total = n_a + n_b;
        let delta = other.mean - self.mean;

        self.mean += delta * n_b / total;
        self.m2 += other.m2 + delta * delta * n_a * n_b / total;
        self.count += other.count;
    }

    /// Number of samples seen.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Arithmetic mean (0 when empty).
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Bessel-corrected sample variance; 0 with fewer than two samples.
    #[inline]
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            (self.m2 / (self.count - 1) as f64).max(0.0)
        }
    }

    /// Sample standard deviation.
    #[inline]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Standard error of the mean, `std_dev / √n` (0 when empty).
    #[inline]
    pub fn std_error(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.std_dev() / (self.count as f64).sqrt()
        }
    }

    /// Symmetric confidence interval `mean ± z·SE`.
    #[inline]
    pub fn confidence_interval(&self, z: f64) -> (f64, f64) {
        let half_width = z * self.std_error();
        (self.mean - half_width, self.mean + half_width)
    }
}

impl FromIterator<f64> for SampleStatistics {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = SampleStatistics::new();
        for value in iter {
            stats.push(value);
        }
        stats
    }
}

impl Extend<f64> for SampleStatistics {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}
