//! Market parameters and precondition checks.
//!
//! Every engine validates its inputs through the `ensure_*` helpers before any
//! work starts, so invalid values never reach a lattice or a simulated path.

use serde::{Deserialize, Serialize};

use super::error::PricingError;

/// Market parameters for a single pricing call.
///
/// # Fields
/// - `spot`: current underlying price S (> 0)
/// - `strike`: strike K (> 0), only used by the built-in payoffs
/// - `maturity`: time to maturity T in years (> 0)
/// - `rate`: continuously compounded annual risk-free rate r
/// - `volatility`: annualised volatility σ (>= 0)
///
/// # Examples
/// ```
/// use pricer_core::types::MarketParams;
///
/// let market = MarketParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap();
/// assert_eq!(market.forward(), 100.0 * (0.05_f64).exp());
///
/// assert!(MarketParams::new(0.0, 100.0, 1.0, 0.05, 0.2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketParams {
    /// Spot price of the underlying.
    pub spot: f64,
    /// Strike price.
    pub strike: f64,
    /// Time to maturity in years.
    pub maturity: f64,
    /// Risk-free rate (annualised, continuously compounded).
    pub rate: f64,
    /// Volatility (annualised).
    pub volatility: f64,
}

impl MarketParams {
    /// Creates validated market parameters.
    ///
    /// # Errors
    /// Returns `PricingError::InvalidParameter` naming the first offending field.
    pub fn new(
        spot: f64,
        strike: f64,
        maturity: f64,
        rate: f64,
        volatility: f64,
    ) -> Result<Self, PricingError> {
        let params = Self {
            spot,
            strike,
            maturity,
            rate,
            volatility,
        };
        params.validate()?;
        Ok(params)
    }

    /// Checks every precondition on the fields.
    pub fn validate(&self) -> Result<(), PricingError> {
        ensure_positive("spot", self.spot)?;
        ensure_positive("strike", self.strike)?;
        ensure_positive("maturity", self.maturity)?;
        ensure_finite("rate", self.rate)?;
        ensure_non_negative("volatility", self.volatility)?;
        Ok(())
    }

    /// Deterministic forward price `S·exp(rT)`.
    #[inline]
    pub fn forward(&self) -> f64 {
        self.spot * (self.rate * self.maturity).exp()
    }
}

impl Default for MarketParams {
    fn default() -> Self {
        Self {
            spot: 100.0,
            strike: 100.0,
            maturity: 1.0,
            rate: 0.05,
            volatility: 0.2,
        }
    }
}

/// Fails unless `value` is finite.
pub fn ensure_finite(field: &'static str, value: f64) -> Result<(), PricingError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PricingError::invalid(
            field,
            format!("must be finite, got {}", value),
        ))
    }
}

/// Fails unless `value` is finite and strictly positive.
pub fn ensure_positive(field: &'static str, value: f64) -> Result<(), PricingError> {
    ensure_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(PricingError::invalid(
            field,
            format!("must be > 0, got {}", value),
        ))
    }
}

/// Fails unless `value` is finite and not negative.
pub fn ensure_non_negative(field: &'static str, value: f64) -> Result<(), PricingError> {
    ensure_finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(PricingError::invalid(
            field,
            format!("must be >= 0, got {}", value),
        ))
    }
}

/// Fails unless `1 <= value <= max`.
pub fn ensure_count(field: &'static str, value: usize, max: usize) -> Result<(), PricingError> {
    if value == 0 || value > max {
        Err(PricingError::invalid(
            field,
            format!("must be in range [1, {}], got {}", max, value),
        ))
    } else {
        Ok(())
    }
}
