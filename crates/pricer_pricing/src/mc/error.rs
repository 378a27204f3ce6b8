//! Error types raised inside the Monte Carlo engine.
//!
//! Failures are reported to callers as
//! [`PricingError::PayoffEvaluation`](pricer_core::types::PricingError); the
//! types here are the causes the engine itself attaches.

use thiserror::Error;

/// The payoff returned NaN or an infinity.
///
/// Such values would silently poison the estimate, so the engine treats them
/// as a payoff failure on the offending trial.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
#[error("payoff returned non-finite value {value}")]
pub struct NonFinitePayoff {
    /// The offending value.
    pub value: f64,
}
