//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod binomial;
pub mod check;
pub mod demo;
pub mod monte_carlo;

use clap::Args;

use crate::config::MarketSection;

/// Market flags shared by the pricing commands; unset flags fall back to
/// the `[market]` section of the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct MarketArgs {
    /// Spot price of the underlying
    #[arg(long)]
    pub spot: Option<f64>,

    /// Time to maturity in years
    #[arg(long)]
    pub maturity: Option<f64>,

    /// Continuously compounded risk-free rate
    #[arg(long, visible_alias = "risk-free-rate", allow_negative_numbers = true)]
    pub rate: Option<f64>,

    /// Annualised volatility
    #[arg(long, allow_negative_numbers = true)]
    pub volatility: Option<f64>,
}

impl MarketArgs {
    /// Overlays the flags that were given on `defaults`.
    pub fn resolve(&self, defaults: &MarketSection) -> MarketSection {
        MarketSection {
            spot: self.spot.unwrap_or(defaults.spot),
            strike: defaults.strike,
            maturity: self.maturity.unwrap_or(defaults.maturity),
            rate: self.rate.unwrap_or(defaults.rate),
            volatility: self.volatility.unwrap_or(defaults.volatility),
        }
    }
}
