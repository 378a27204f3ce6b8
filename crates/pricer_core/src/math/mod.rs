//! Numerical helpers shared by the lattice and Monte Carlo engines.
//!
//! - [`discount_factor`]: continuous-compounding discount factor
//! - [`lattice`]: CRR up/down factors and risk-neutral probability
//! - [`statistics`]: streaming mean/variance with pairwise merge

pub mod lattice;
pub mod statistics;

pub use lattice::CrrFactors;
pub use statistics::{SampleStatistics, Z_95};

/// Discount factor `exp(-r·t)`.
///
/// # Examples
/// ```
/// use pricer_core::math::discount_factor;
///
/// assert_eq!(discount_factor(0.05, 0.0), 1.0);
/// assert!((discount_factor(0.05, 1.0) - (-0.05_f64).exp()).abs() < 1e-15);
/// ```
#[inline]
pub fn discount_factor(rate: f64, time: f64) -> f64 {
    (-rate * time).exp()
}
