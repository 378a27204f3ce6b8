//! Traits shared across the pricing layers.
//!
//! - [`payoff::PathPayoff`]: the payoff contract consumed by both engines

pub mod payoff;

pub use payoff::{from_fn, ArithmeticAsianPayoff, PathPayoff, PayoffFn, VanillaPayoff};
