//! optpricer - Command Line Option Pricing
//!
//! Operational entry point for the binomial lattice and Monte Carlo engines.
//!
//! # Commands
//!
//! - `optpricer demo` - Price the reference European and Asian calls
//! - `optpricer binomial --kind put --american` - CRR lattice pricing
//! - `optpricer monte-carlo --payoff-expr "max(path) - 100"` - GBM simulation
//! - `optpricer check "<expr>"` - Compile a payoff expression
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate wires the pricing engines
//! and the payoff expression adapter to a command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use error::{CliError, Result};

use commands::binomial::BinomialArgs;
use commands::monte_carlo::MonteCarloArgs;
use config::CliConfig;
use output::OutputFormat;

/// Option pricing with a binomial lattice and Monte Carlo simulation
#[derive(Parser)]
#[command(name = "optpricer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "optpricer.toml")]
    config: PathBuf,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Price the reference European call (binomial) and Asian call (Monte Carlo)
    Demo,

    /// Price a European or American option on a CRR lattice
    Binomial(BinomialArgs),

    /// Price a path payoff by Monte Carlo simulation
    MonteCarlo(MonteCarloArgs),

    /// Check that a payoff expression compiles
    Check {
        /// Expression over `path`
        expression: String,
    },
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let config = CliConfig::load(&cli.config)?;

    match cli.command.unwrap_or(Commands::Demo) {
        Commands::Demo => commands::demo::run(&config, cli.format),
        Commands::Binomial(args) => commands::binomial::run(&args, &config, cli.format),
        Commands::MonteCarlo(args) => commands::monte_carlo::run(&args, &config, cli.format),
        Commands::Check { expression } => commands::check::run(&expression, cli.format),
    }
}
