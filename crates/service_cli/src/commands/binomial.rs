//! Binomial command implementation
//!
//! Prices a European or American call/put on a CRR lattice.

use clap::Args;
use pricer_core::types::{ExerciseStyle, MarketParams, OptionKind};
use pricer_pricing::{BinomialTreePricer, LatticeConfig};
use serde::Serialize;
use tracing::info;

use super::MarketArgs;
use crate::config::CliConfig;
use crate::output::{emit, OutputFormat, Report};
use crate::Result;

/// Arguments of `optpricer binomial`.
#[derive(Debug, Clone, Default, Args)]
pub struct BinomialArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Strike price
    #[arg(long)]
    pub strike: Option<f64>,

    /// Number of lattice steps
    #[arg(long)]
    pub steps: Option<usize>,

    /// Option kind (call or put)
    #[arg(long, default_value = "call")]
    pub kind: OptionKind,

    /// Allow early exercise
    #[arg(long)]
    pub american: bool,
}

/// Output of the binomial command.
#[derive(Debug, Clone, Serialize)]
pub struct BinomialReport {
    pub market: MarketParams,
    pub kind: OptionKind,
    pub style: ExerciseStyle,
    pub steps: usize,
    pub price: f64,
}

impl Report for BinomialReport {
    fn table(&self) -> String {
        format!(
            "{} {} price (binomial, {} steps): {:.4}",
            capitalise(self.style.to_string()),
            self.kind,
            self.steps,
            self.price
        )
    }
}

fn capitalise(word: String) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => word,
    }
}

/// Prices the option described by `args`.
pub fn execute(args: &BinomialArgs, config: &CliConfig) -> Result<BinomialReport> {
    let section = args.market.resolve(&config.market);
    let market = MarketParams {
        spot: section.spot,
        strike: args.strike.unwrap_or(section.strike),
        maturity: section.maturity,
        rate: section.rate,
        volatility: section.volatility,
    };
    let steps = args.steps.unwrap_or(config.simulation.tree_steps);
    let style = ExerciseStyle::from_american(args.american);

    let pricer = BinomialTreePricer::new(LatticeConfig::new(steps, args.kind, style));
    let price = pricer.price(&market)?;

    Ok(BinomialReport {
        market,
        kind: args.kind,
        style,
        steps,
        price,
    })
}

/// Run the binomial command
pub fn run(args: &BinomialArgs, config: &CliConfig, format: OutputFormat) -> Result<()> {
    info!(kind = %args.kind, american = args.american, "pricing on binomial lattice");
    emit(&execute(args, config)?, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults_price_european_call() {
        let report = execute(&BinomialArgs::default(), &CliConfig::default()).unwrap();

        assert_eq!(report.steps, 200);
        assert_eq!(report.style, ExerciseStyle::European);
        assert_relative_eq!(report.price, 10.4506, epsilon = 0.02);
        assert!(report.table().starts_with("European call price (binomial, 200 steps): "));
    }

    #[test]
    fn test_american_put_flags() {
        let args = BinomialArgs {
            strike: Some(110.0),
            steps: Some(100),
            kind: OptionKind::Put,
            american: true,
            ..Default::default()
        };
        let report = execute(&args, &CliConfig::default()).unwrap();

        assert_eq!(report.market.strike, 110.0);
        assert!(report.price >= 10.0);
        assert!(report.table().starts_with("American put"));
    }

    #[test]
    fn test_invalid_volatility_is_rejected() {
        let args = BinomialArgs {
            market: MarketArgs {
                volatility: Some(-0.1),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = execute(&args, &CliConfig::default()).unwrap_err();
        assert!(err.to_string().contains("volatility"));
    }
}
