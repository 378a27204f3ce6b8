//! CLI error types

use adapter_payoff::ExpressionError;
use pricer_core::PricingError;
use thiserror::Error;

/// Errors surfaced by `optpricer` commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// A pricing engine rejected its inputs or the payoff failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// The payoff expression did not compile.
    #[error("Invalid payoff expression: {0}")]
    Expression(#[from] ExpressionError),

    /// The configuration file could not be read or parsed.
    #[error("Configuration error in {path}: {message}")]
    Config { path: String, message: String },

    /// Arguments were inconsistent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the CLI.
pub type Result<T> = std::result::Result<T, CliError>;
