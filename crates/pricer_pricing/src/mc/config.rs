//! Monte Carlo simulation configuration.
//!
//! This module provides the configuration type and builder for Monte Carlo
//! pricing runs.

use pricer_core::types::{ensure_count, PricingError};

/// Maximum number of simulation paths allowed.
pub const MAX_PATHS: usize = 50_000_000;

/// Maximum number of time steps allowed per path.
pub const MAX_STEPS: usize = 100_000;

/// Monte Carlo simulation configuration.
///
/// Immutable configuration specifying simulation parameters.
/// Use [`MonteCarloConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::MonteCarloConfig;
///
/// let config = MonteCarloConfig::builder()
///     .n_paths(10_000)
///     .n_steps(252)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.n_paths(), 10_000);
/// assert_eq!(config.n_steps(), 252);
/// assert!(!config.parallel());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonteCarloConfig {
    /// Number of simulation paths.
    n_paths: usize,
    /// Number of time steps per path.
    n_steps: usize,
    /// Optional seed for reproducibility.
    seed: Option<u64>,
    /// Simulate path blocks on the rayon pool.
    parallel: bool,
}

impl MonteCarloConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> MonteCarloConfigBuilder {
        MonteCarloConfigBuilder::default()
    }

    /// Returns the number of simulation paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Returns the number of time steps per path.
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Returns the optional seed for reproducibility.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns whether path blocks run in parallel.
    #[inline]
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` if:
    /// - `n_paths` is 0 or greater than [`MAX_PATHS`] (field `"paths"`)
    /// - `n_steps` is 0 or greater than [`MAX_STEPS`] (field `"steps"`)
    pub fn validate(&self) -> Result<(), PricingError> {
        ensure_count("steps", self.n_steps, MAX_STEPS)?;
        ensure_count("paths", self.n_paths, MAX_PATHS)?;
        Ok(())
    }
}

/// Builder for [`MonteCarloConfig`].
///
/// Provides a fluent API for constructing Monte Carlo configurations
/// with validation at build time.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::MonteCarloConfig;
///
/// let config = MonteCarloConfig::builder()
///     .n_paths(50_000)
///     .n_steps(252)  // Daily steps for 1 year
///     .seed(12345)
///     .parallel(true)
///     .build()
///     .expect("valid config");
/// assert!(config.parallel());
/// ```
#[derive(Clone, Debug, Default)]
pub struct MonteCarloConfigBuilder {
    n_paths: Option<usize>,
    n_steps: Option<usize>,
    seed: Option<u64>,
    parallel: bool,
}

impl MonteCarloConfigBuilder {
    /// Sets the number of simulation paths.
    ///
    /// # Arguments
    ///
    /// * `n_paths` - Number of paths in [1, 50_000_000]
    #[inline]
    pub fn n_paths(mut self, n_paths: usize) -> Self {
        self.n_paths = Some(n_paths);
        self
    }

    /// Sets the number of time steps per path.
    ///
    /// # Arguments
    ///
    /// * `n_steps` - Number of steps in [1, 100_000]
    #[inline]
    pub fn n_steps(mut self, n_steps: usize) -> Self {
        self.n_steps = Some(n_steps);
        self
    }

    /// Sets the seed for reproducibility.
    ///
    /// Runs with the same seed and parameters produce identical results.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets an optional seed; `None` draws one from entropy per run.
    #[inline]
    pub fn maybe_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables parallel path simulation.
    ///
    /// Results do not depend on this flag.
    #[inline]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Builds the configuration with validation.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidParameter` if a count is missing or out
    /// of range.
    pub fn build(self) -> Result<MonteCarloConfig, PricingError> {
        let n_paths = self
            .n_paths
            .ok_or_else(|| PricingError::invalid("paths", "n_paths is required"))?;
        let n_steps = self
            .n_steps
            .ok_or_else(|| PricingError::invalid("steps", "n_steps is required"))?;

        let config = MonteCarloConfig {
            n_paths,
            n_steps,
            seed: self.seed,
            parallel: self.parallel,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_basic() {
        let config = MonteCarloConfig::builder()
            .n_paths(1000)
            .n_steps(100)
            .build()
            .unwrap();

        assert_eq!(config.n_paths(), 1000);
        assert_eq!(config.n_steps(), 100);
        assert_eq!(config.seed(), None);
        assert!(!config.parallel());
    }

    #[test]
    fn test_builder_with_seed() {
        let config = MonteCarloConfig::builder()
            .n_paths(1000)
            .n_steps(100)
            .seed(42)
            .build()
            .unwrap();

        assert_eq!(config.seed(), Some(42));

        let cleared = MonteCarloConfig::builder()
            .n_paths(1000)
            .n_steps(100)
            .seed(42)
            .maybe_seed(None)
            .build()
            .unwrap();
        assert_eq!(cleared.seed(), None);
    }

    #[test]
    fn test_builder_missing_counts() {
        let err = MonteCarloConfig::builder().n_steps(100).build().unwrap_err();
        assert_eq!(err.field(), Some("paths"));

        let err = MonteCarloConfig::builder().n_paths(100).build().unwrap_err();
        assert_eq!(err.field(), Some("steps"));
    }

    #[test]
    fn test_builder_rejects_zero_counts() {
        let err = MonteCarloConfig::builder()
            .n_paths(0)
            .n_steps(10)
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("paths"));

        let err = MonteCarloConfig::builder()
            .n_paths(10)
            .n_steps(0)
            .build()
            .unwrap_err();
        assert_eq!(err.field(), Some("steps"));
    }

    #[test]
    fn test_builder_rejects_oversized_counts() {
        let err = MonteCarloConfig::builder()
            .n_paths(MAX_PATHS + 1)
            .n_steps(10)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("50000000"));

        assert!(MonteCarloConfig::builder()
            .n_paths(10)
            .n_steps(MAX_STEPS)
            .build()
            .is_ok());
    }
}
