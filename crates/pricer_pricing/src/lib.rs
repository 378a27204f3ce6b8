//! # Pricer Engines (Layer 2)
//!
//! pricer_pricing implements the two numerical engines of the workspace:
//! - [`tree`]: Cox-Ross-Rubinstein binomial lattice, European and American
//!   exercise
//! - [`mc`]: Monte Carlo simulation under geometric Brownian motion for any
//!   path-dependent payoff
//! - [`rng`]: seeded generators and block streams backing the simulation
//!
//! Both engines are pure functions of their inputs: they validate everything
//! up front, share no state and perform no I/O.
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_core::traits::VanillaPayoff;
//! use pricer_core::types::OptionKind;
//! use pricer_pricing::{binomial_price, monte_carlo_price};
//!
//! let tree = binomial_price(100.0, 100.0, 1.0, 0.05, 0.2, 500, OptionKind::Call, false).unwrap();
//!
//! let payoff = VanillaPayoff::call(100.0);
//! let mc = monte_carlo_price(&payoff, 100.0, 1.0, 0.05, 0.2, 1, 50_000, Some(42)).unwrap();
//!
//! assert!((mc.estimate - tree).abs() < 4.0 * mc.std_error);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`MonteCarloResult`]

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod mc;
pub mod rng;
pub mod tree;

pub use mc::{
    monte_carlo_price, GbmParams, MonteCarloConfig, MonteCarloPricer, MonteCarloResult,
};
pub use tree::{binomial_price, BinomialTreePricer, LatticeConfig};
