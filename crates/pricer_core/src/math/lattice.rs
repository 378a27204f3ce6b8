//! Cox-Ross-Rubinstein lattice parameterisation.
//!
//! # Mathematical Definition
//! ```text
//! Δt = T / N
//! u  = exp(σ√Δt),  d = 1 / u
//! p  = (exp(rΔt) - d) / (u - d)
//! ```
//!
//! With σ = 0 the lattice collapses (u = d = 1) and `p` is undefined; callers
//! check [`CrrFactors::is_degenerate`] before using it.

/// Per-step factors of a CRR binomial lattice.
///
/// # Examples
/// ```
/// use pricer_core::math::CrrFactors;
///
/// let f = CrrFactors::new(1.0, 0.05, 0.2, 100);
/// assert!((f.up * f.down - 1.0).abs() < 1e-15);
/// assert!(f.has_valid_probability());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrrFactors {
    /// Step length Δt in years.
    pub dt: f64,
    /// Up factor u.
    pub up: f64,
    /// Down factor d = 1/u.
    pub down: f64,
    /// One-step discount factor exp(-rΔt).
    pub step_discount: f64,
    /// Risk-neutral up probability p (NaN when the lattice is degenerate).
    pub probability: f64,
}

impl CrrFactors {
    /// Derives the lattice factors for `steps` steps over `maturity` years.
    pub fn new(maturity: f64, rate: f64, volatility: f64, steps: usize) -> Self {
        let dt = maturity / steps as f64;
        let up = (volatility * dt.sqrt()).exp();
        let down = 1.0 / up;
        let growth = (rate * dt).exp();
        let probability = if up > down {
            (growth - down) / (up - down)
        } else {
            f64::NAN
        };

        Self {
            dt,
            up,
            down,
            step_discount: 1.0 / growth,
            probability,
        }
    }

    /// Returns true when the lattice has no branching (zero volatility).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.up > self.down)
    }

    /// Returns true when `p` lies in [0, 1].
    ///
    /// Coarse steps combined with extreme rates can push `p` outside this
    /// range; the classical CRR scheme does not clamp it.
    #[inline]
    pub fn has_valid_probability(&self) -> bool {
        (0.0..=1.0).contains(&self.probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_factors_standard_parameters() {
        let f = CrrFactors::new(1.0, 0.05, 0.2, 1);
        assert_relative_eq!(f.up, (0.2_f64).exp(), epsilon = 1e-15);
        assert_relative_eq!(f.down, (-0.2_f64).exp(), epsilon = 1e-15);
        assert_relative_eq!(f.step_discount, (-0.05_f64).exp(), epsilon = 1e-15);

        let expected_p = ((0.05_f64).exp() - f.down) / (f.up - f.down);
        assert_relative_eq!(f.probability, expected_p, epsilon = 1e-15);
    }

    #[test]
    fn test_risk_neutral_expectation_grows_at_rate() {
        let f = CrrFactors::new(0.5, 0.03, 0.25, 10);
        let expected = f.probability * f.up + (1.0 - f.probability) * f.down;
        assert_relative_eq!(expected, (0.03 * f.dt).exp(), epsilon = 1e-14);
    }

    #[test]
    fn test_zero_volatility_is_degenerate() {
        let f = CrrFactors::new(1.0, 0.05, 0.0, 10);
        assert!(f.is_degenerate());
        assert!(f.probability.is_nan());
        assert!(!f.has_valid_probability());
    }

    #[test]
    fn test_extreme_rate_pushes_probability_out_of_range() {
        let f = CrrFactors::new(1.0, 0.5, 0.01, 1);
        assert!(!f.is_degenerate());
        assert!(f.probability > 1.0);
        assert!(!f.has_valid_probability());
    }
}
