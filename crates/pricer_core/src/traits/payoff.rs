//! The payoff contract shared by the pricing engines.
//!
//! A payoff maps an ordered sequence of simulated spot prices to a
//! non-negative amount. Engines never inspect how a payoff was built: a
//! closure, one of the built-in payoffs below, or a callable compiled from a
//! user expression by an adapter crate all look the same.

use thiserror::Error;

use crate::types::error::PayoffFailure;
use crate::types::option::OptionKind;

/// A payoff over one simulated price path.
///
/// `path` holds the simulated spot prices in chronological order, excluding
/// the initial spot; its length equals the number of time steps.
///
/// Payoffs are expected to return non-negative values. The engines do not
/// enforce this, but they do reject non-finite values.
///
/// Any closure `Fn(&[f64]) -> Result<f64, PayoffFailure>` is a payoff; use
/// [`from_fn`] for infallible closures.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so paths can be evaluated on
/// several threads.
///
/// # Examples
/// ```
/// use pricer_core::traits::payoff::{from_fn, PathPayoff};
///
/// let lookback = from_fn(|path: &[f64]| {
///     let max = path.iter().cloned().fold(f64::MIN, f64::max);
///     (max - 100.0).max(0.0)
/// });
/// assert_eq!(lookback.evaluate(&[95.0, 110.0, 105.0]).unwrap(), 10.0);
/// ```
pub trait PathPayoff: Send + Sync {
    /// Evaluates the payoff on a completed path.
    fn evaluate(&self, path: &[f64]) -> Result<f64, PayoffFailure>;
}

impl<F> PathPayoff for F
where
    F: Fn(&[f64]) -> Result<f64, PayoffFailure> + Send + Sync,
{
    #[inline]
    fn evaluate(&self, path: &[f64]) -> Result<f64, PayoffFailure> {
        self(path)
    }
}

/// Payoff wrapper for closures that cannot fail.
#[derive(Clone, Copy, Debug)]
pub struct PayoffFn<F>(F);

/// Wraps an infallible closure as a [`PathPayoff`].
#[inline]
pub fn from_fn<F>(f: F) -> PayoffFn<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    PayoffFn(f)
}

impl<F> PathPayoff for PayoffFn<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    #[inline]
    fn evaluate(&self, path: &[f64]) -> Result<f64, PayoffFailure> {
        Ok((self.0)(path))
    }
}

/// Raised by the built-in payoffs when handed a path with no observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("price path is empty")]
pub struct EmptyPathError;

/// European call/put on the terminal price of the path.
///
/// # Examples
/// ```
/// use pricer_core::traits::payoff::{PathPayoff, VanillaPayoff};
///
/// let call = VanillaPayoff::call(100.0);
/// assert_eq!(call.evaluate(&[90.0, 120.0]).unwrap(), 20.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VanillaPayoff {
    /// Call or put.
    pub kind: OptionKind,
    /// Strike price.
    pub strike: f64,
}

impl VanillaPayoff {
    /// Creates a vanilla payoff.
    #[inline]
    pub fn new(kind: OptionKind, strike: f64) -> Self {
        Self { kind, strike }
    }

    /// Call payoff `max(S_T - K, 0)`.
    #[inline]
    pub fn call(strike: f64) -> Self {
        Self::new(OptionKind::Call, strike)
    }

    /// Put payoff `max(K - S_T, 0)`.
    #[inline]
    pub fn put(strike: f64) -> Self {
        Self::new(OptionKind::Put, strike)
    }

    /// Payoff for a single terminal price.
    #[inline]
    pub fn terminal(&self, spot: f64) -> f64 {
        self.kind.intrinsic(spot, self.strike)
    }
}

impl PathPayoff for VanillaPayoff {
    fn evaluate(&self, path: &[f64]) -> Result<f64, PayoffFailure> {
        let terminal = path.last().ok_or(EmptyPathError)?;
        Ok(self.terminal(*terminal))
    }
}

/// Arithmetic-average Asian call/put over every observation of the path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArithmeticAsianPayoff {
    /// Call or put.
    pub kind: OptionKind,
    /// Strike price.
    pub strike: f64,
}

impl ArithmeticAsianPayoff {
    /// Creates an arithmetic Asian payoff.
    #[inline]
    pub fn new(kind: OptionKind, strike: f64) -> Self {
        Self { kind, strike }
    }

    /// Average-price call `max(mean(path) - K, 0)`.
    #[inline]
    pub fn call(strike: f64) -> Self {
        Self::new(OptionKind::Call, strike)
    }

    /// Average-price put `max(K - mean(path), 0)`.
    #[inline]
    pub fn put(strike: f64) -> Self {
        Self::new(OptionKind::Put, strike)
    }
}

impl PathPayoff for ArithmeticAsianPayoff {
    fn evaluate(&self, path: &[f64]) -> Result<f64, PayoffFailure> {
        if path.is_empty() {
            return Err(EmptyPathError.into());
        }
        let average = path.iter().sum::<f64>() / path.len() as f64;
        Ok(self.kind.intrinsic(average, self.strike))
    }
}
