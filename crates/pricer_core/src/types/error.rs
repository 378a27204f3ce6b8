//! Error types for structured error handling.
//!
//! This module provides:
//! - `PricingError`: the taxonomy shared by the tree and Monte Carlo engines
//! - `PayoffFailure`: the boxed cause carried out of a failing payoff callable

use thiserror::Error;

/// Underlying cause of a payoff evaluation failure.
///
/// Payoff callables are free to fail with any error type; the engines only
/// need to carry the cause through to the caller.
pub type PayoffFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Categorised pricing errors.
///
/// # Variants
/// - `InvalidParameter`: a precondition on the inputs was violated
/// - `PayoffEvaluation`: the supplied payoff failed on a simulated path
///
/// Numerical degeneracies such as zero volatility are handled as special
/// cases by the engines and never surface here.
///
/// # Examples
/// ```
/// use pricer_core::types::PricingError;
///
/// let err = PricingError::invalid("spot", "must be > 0, got 0");
/// assert_eq!(err.to_string(), "Invalid parameter 'spot': must be > 0, got 0");
/// assert_eq!(err.field(), Some("spot"));
/// ```
#[derive(Debug, Error)]
pub enum PricingError {
    /// A precondition violation, raised before any computation starts.
    #[error("Invalid parameter '{field}': {reason}")]
    InvalidParameter {
        /// Name of the offending field (e.g. `"spot"`, `"paths"`).
        field: &'static str,
        /// Human readable description of the violation.
        reason: String,
    },

    /// The payoff callable failed while evaluating a simulated path.
    #[error("Payoff evaluation failed on trial {trial}: {source}")]
    PayoffEvaluation {
        /// Zero-based index of the trial whose path could not be evaluated.
        trial: usize,
        /// The failure reported by the payoff.
        #[source]
        source: PayoffFailure,
    },
}

impl PricingError {
    /// Builds an `InvalidParameter` error.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        PricingError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    /// Returns the offending field name for `InvalidParameter` errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            PricingError::InvalidParameter { field, .. } => Some(field),
            PricingError::PayoffEvaluation { .. } => None,
        }
    }

    /// Returns the failing trial index for `PayoffEvaluation` errors.
    pub fn trial(&self) -> Option<usize> {
        match self {
            PricingError::PayoffEvaluation { trial, .. } => Some(*trial),
            PricingError::InvalidParameter { .. } => None,
        }
    }
}
