//! # pricer_core: Foundation for the Option Pricing Engines
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace and provides:
//! - Market and contract value types: `MarketParams`, `OptionKind`, `ExerciseStyle` (`types`)
//! - Error taxonomy: `PricingError` (`types::error`)
//! - The payoff contract consumed by both engines: `PathPayoff` (`traits::payoff`)
//! - Shared numerics: discounting, CRR lattice factors, sample statistics (`math`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates and only two external ones:
//! - thiserror: error derivation
//! - serde: serialisation of the value types
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::math::{discount_factor, SampleStatistics};
//! use pricer_core::types::{MarketParams, OptionKind};
//!
//! let market = MarketParams::new(100.0, 95.0, 1.0, 0.05, 0.2).unwrap();
//! assert_eq!(OptionKind::Call.intrinsic(market.spot, market.strike), 5.0);
//!
//! let df = discount_factor(market.rate, market.maturity);
//! assert!(df < 1.0);
//!
//! let mut stats = SampleStatistics::new();
//! stats.push(1.0);
//! stats.push(3.0);
//! assert_eq!(stats.mean(), 2.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod traits;
pub mod types;

pub use traits::payoff::{ArithmeticAsianPayoff, PathPayoff, VanillaPayoff};
pub use types::error::{PayoffFailure, PricingError};
