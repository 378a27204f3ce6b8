//! Core value types for option pricing.
//!
//! This module provides:
//! - [`MarketParams`]: spot, strike, maturity, rate and volatility
//! - [`OptionKind`] and [`ExerciseStyle`]: contract definitions
//! - [`PricingError`]: structured error taxonomy
//! - `ensure_*` helpers: fail-fast precondition checks shared by the engines

pub mod error;
pub mod market;
pub mod option;

pub use error::{PayoffFailure, PricingError};
pub use market::{
    ensure_count, ensure_finite, ensure_non_negative, ensure_positive, MarketParams,
};
pub use option::{ExerciseStyle, OptionKind};
