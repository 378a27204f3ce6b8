//! Option contract definitions.
//!
//! This module provides the call/put kind and the exercise style used by the
//! lattice pricer and by the built-in payoffs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::PricingError;

/// Option kind (call or put).
///
/// # Examples
/// ```
/// use pricer_core::types::OptionKind;
///
/// assert_eq!(OptionKind::Call.intrinsic(110.0, 100.0), 10.0);
/// assert_eq!(OptionKind::Put.intrinsic(110.0, 100.0), 0.0);
/// assert_eq!("put".parse::<OptionKind>().unwrap(), OptionKind::Put);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// Right to buy: pays `max(S - K, 0)`.
    #[default]
    Call,
    /// Right to sell: pays `max(K - S, 0)`.
    Put,
}

impl OptionKind {
    /// Immediate-exercise value at `spot` for the given `strike`.
    #[inline]
    pub fn intrinsic(self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionKind::Call => (spot - strike).max(0.0),
            OptionKind::Put => (strike - spot).max(0.0),
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            OptionKind::Call => "call",
            OptionKind::Put => "put",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionKind {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "call" | "c" => Ok(OptionKind::Call),
            "put" | "p" => Ok(OptionKind::Put),
            other => Err(PricingError::invalid(
                "option_kind",
                format!("expected 'call' or 'put', got '{}'", other),
            )),
        }
    }
}

/// Option exercise style.
///
/// # Variants
/// - `European`: exercise only at maturity
/// - `American`: exercise at any lattice node up to and including maturity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseStyle {
    /// Exercise only at maturity.
    #[default]
    European,
    /// Exercise at any time up to maturity.
    American,
}

impl ExerciseStyle {
    /// Maps the `american` flag of the flat pricing contract onto a style.
    #[inline]
    pub fn from_american(american: bool) -> Self {
        if american {
            ExerciseStyle::American
        } else {
            ExerciseStyle::European
        }
    }

    /// Returns whether early exercise is allowed.
    #[inline]
    pub fn is_american(self) -> bool {
        matches!(self, ExerciseStyle::American)
    }
}

impl fmt::Display for ExerciseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseStyle::European => f.write_str("european"),
            ExerciseStyle::American => f.write_str("american"),
        }
    }
}
