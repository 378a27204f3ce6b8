//! Monte Carlo pricing under geometric Brownian motion.
//!
//! # Architecture
//!
//! ```text
//! MonteCarloPricer
//! ├── MonteCarloConfig  (paths, steps, seed, parallel)
//! ├── GbmStepper        (exact log-space path generation)
//! ├── PricerRng         (one stream per block of PATH_BLOCK paths)
//! └── SampleStatistics  (per-block accumulators merged in block order)
//! ```
//!
//! Any [`PathPayoff`](pricer_core::traits::PathPayoff) can be priced: the
//! engine hands it each completed path and never looks inside.
//!
//! # Examples
//!
//! ```rust
//! use pricer_core::traits::from_fn;
//! use pricer_pricing::mc::{GbmParams, MonteCarloConfig, MonteCarloPricer};
//!
//! // Lookback call on the running maximum
//! let lookback = from_fn(|path: &[f64]| {
//!     let max = path.iter().cloned().fold(f64::MIN, f64::max);
//!     (max - 100.0).max(0.0)
//! });
//!
//! let config = MonteCarloConfig::builder()
//!     .n_paths(20_000)
//!     .n_steps(52)
//!     .seed(7)
//!     .parallel(true)
//!     .build()
//!     .unwrap();
//!
//! let result = MonteCarloPricer::new(config)
//!     .price(&lookback, &GbmParams::default())
//!     .unwrap();
//! assert!(result.estimate > 0.0);
//! ```

mod config;
mod error;
mod paths;
mod pricer;
mod result;

pub use config::{MonteCarloConfig, MonteCarloConfigBuilder, MAX_PATHS, MAX_STEPS};
pub use error::NonFinitePayoff;
pub use paths::{GbmParams, GbmStepper};
pub use pricer::{monte_carlo_price, MonteCarloPricer, PATH_BLOCK};
pub use result::MonteCarloResult;
