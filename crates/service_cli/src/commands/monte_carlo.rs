//! Monte Carlo command implementation
//!
//! Prices a built-in payoff or a compiled payoff expression over simulated
//! GBM paths.

use adapter_payoff::annotate_source;
use clap::{Args, ValueEnum};
use pricer_core::traits::{ArithmeticAsianPayoff, PathPayoff, VanillaPayoff};
use pricer_pricing::{GbmParams, MonteCarloConfig, MonteCarloPricer, MonteCarloResult};
use serde::Serialize;
use tracing::{info, warn};

use super::MarketArgs;
use crate::config::CliConfig;
use crate::output::{emit, OutputFormat, Report};
use crate::{CliError, Result};

/// Built-in payoffs selectable with `--payoff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuiltinPayoff {
    /// `max(S_T - K, 0)`
    #[default]
    Call,
    /// `max(K - S_T, 0)`
    Put,
    /// `max(mean(path) - K, 0)`
    AsianCall,
    /// `max(K - mean(path), 0)`
    AsianPut,
}

impl BuiltinPayoff {
    fn build(self, strike: f64) -> Box<dyn PathPayoff> {
        match self {
            BuiltinPayoff::Call => Box::new(VanillaPayoff::call(strike)),
            BuiltinPayoff::Put => Box::new(VanillaPayoff::put(strike)),
            BuiltinPayoff::AsianCall => Box::new(ArithmeticAsianPayoff::call(strike)),
            BuiltinPayoff::AsianPut => Box::new(ArithmeticAsianPayoff::put(strike)),
        }
    }
}

/// Arguments of `optpricer monte-carlo`.
#[derive(Debug, Clone, Default, Args)]
pub struct MonteCarloArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Built-in payoff
    #[arg(long, value_enum, conflicts_with = "payoff_expr")]
    pub payoff: Option<BuiltinPayoff>,

    /// Strike for the built-in payoffs
    #[arg(long)]
    pub strike: Option<f64>,

    /// Payoff expression over `path`, e.g. "max(path[-1] - 100, 0)"
    #[arg(long)]
    pub payoff_expr: Option<String>,

    /// Time steps per path
    #[arg(long)]
    pub steps: Option<usize>,

    /// Number of simulated paths
    #[arg(long)]
    pub paths: Option<usize>,

    /// Master seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Simulate path blocks in parallel (same result as sequential)
    #[arg(long, value_name = "BOOL")]
    pub parallel: Option<bool>,
}

/// Output of the monte-carlo command.
#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloReport {
    /// Payoff description: the built-in name or the expression text.
    pub payoff: String,
    pub steps: usize,
    pub result: MonteCarloResult,
}

impl Report for MonteCarloReport {
    fn table(&self) -> String {
        let r = &self.result;
        [
            format!("Payoff: {}", self.payoff),
            format!("Price: {:.4}", r.estimate),
            format!("95% CI: ± {:.4}", r.half_width()),
            format!("Interval: [{:.4}, {:.4}]", r.ci_low, r.ci_high),
            format!("Std error: {:.6}", r.std_error),
            format!("Paths: {} x {} steps", r.n_paths, self.steps),
            format!("Seed: {}", r.seed),
        ]
        .join("\n")
    }
}

fn select_payoff(args: &MonteCarloArgs, strike: f64) -> Result<(String, Box<dyn PathPayoff>)> {
    if args.payoff_expr.is_some() && args.strike.is_some() {
        return Err(CliError::InvalidArgument(
            "--strike only applies to --payoff; write the strike into the expression".to_string(),
        ));
    }

    match (&args.payoff_expr, args.payoff) {
        (Some(source), _) => match adapter_payoff::compile(source) {
            Ok(expr) => {
                let name = expr.source().to_string();
                let payoff: Box<dyn PathPayoff> = Box::new(expr);
                Ok((name, payoff))
            }
            Err(err) => {
                warn!("payoff expression rejected:\n{}", annotate_source(source, err.span()));
                Err(err.into())
            }
        },
        (None, builtin) => {
            let builtin = builtin.unwrap_or_default();
            let name = builtin
                .to_possible_value()
                .map(|v| v.get_name().to_string())
                .unwrap_or_default();
            Ok((format!("{} (K={})", name, strike), builtin.build(strike)))
        }
    }
}

/// Runs the simulation described by `args`.
pub fn execute(args: &MonteCarloArgs, config: &CliConfig) -> Result<MonteCarloReport> {
    let market = args.market.resolve(&config.market);
    let strike = args.strike.unwrap_or(market.strike);
    let steps = args.steps.unwrap_or(config.simulation.steps);

    let gbm = GbmParams::new(market.spot, market.rate, market.volatility, market.maturity);
    gbm.validate()?;

    let mc_config = MonteCarloConfig::builder()
        .n_paths(args.paths.unwrap_or(config.simulation.paths))
        .n_steps(steps)
        .maybe_seed(args.seed.or(config.simulation.seed))
        .parallel(args.parallel.unwrap_or(config.simulation.parallel))
        .build()?;

    let (payoff_name, payoff) = select_payoff(args, strike)?;
    let result = MonteCarloPricer::new(mc_config).price(payoff.as_ref(), &gbm)?;

    Ok(MonteCarloReport {
        payoff: payoff_name,
        steps,
        result,
    })
}

/// Run the monte-carlo command
pub fn run(args: &MonteCarloArgs, config: &CliConfig, format: OutputFormat) -> Result<()> {
    info!("running Monte Carlo simulation");
    let report = execute(args, config)?;
    info!(seed = report.result.seed, "simulation complete");
    emit(&report, format)
}
