//! Pricing form endpoints
//!
//! `GET /` renders the form with defaults. `POST /` parses the url-encoded
//! form, prices the payoff by Monte Carlo on the blocking pool and renders
//! the form again with either the result or the error (status 422).

use std::str::FromStr;

use adapter_payoff::{annotate_source, ExpressionError};
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Router,
};
use pricer_core::traits::{PathPayoff, VanillaPayoff};
use pricer_core::PricingError;
use pricer_pricing::{monte_carlo_price, MonteCarloResult};
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, warn};

use super::page::{self, Outcome};
use super::AppState;
use crate::config::ServerConfig;

/// Raw form fields, kept as text so they can be echoed back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PriceForm {
    pub spot: String,
    pub strike: String,
    pub maturity: String,
    pub risk_free_rate: String,
    pub volatility: String,
    pub steps: String,
    pub paths: String,
    pub seed: String,
    pub payoff_mode: String,
    pub payoff_expr: String,
}

impl Default for PriceForm {
    fn default() -> Self {
        Self {
            spot: "100".to_string(),
            strike: "100".to_string(),
            maturity: "1".to_string(),
            risk_free_rate: "0.05".to_string(),
            volatility: "0.2".to_string(),
            steps: "252".to_string(),
            paths: "20000".to_string(),
            seed: String::new(),
            payoff_mode: "call".to_string(),
            payoff_expr: String::new(),
        }
    }
}

/// Payoff selector of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoffMode {
    Call,
    Put,
    Custom,
}

impl FromStr for PayoffMode {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "call" => Ok(PayoffMode::Call),
            "put" => Ok(PayoffMode::Put),
            "custom" => Ok(PayoffMode::Custom),
            other => Err(FormError::UnknownPayoffMode(other.to_string())),
        }
    }
}

/// Why a submission could not be priced.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must be a non-negative whole number, got '{value}'")]
    NotAnInteger { field: &'static str, value: String },

    #[error("unknown payoff type '{0}'; choose call, put or custom")]
    UnknownPayoffMode(String),

    #[error("{paths} paths × {steps} steps exceeds the limit of {limit} simulated prices per request")]
    OverBudget { paths: usize, steps: usize, limit: u64 },

    #[error("{0}")]
    Expression(#[from] ExpressionError),

    #[error("{0}")]
    Pricing(#[from] PricingError),

    #[error("simulation task failed: {0}")]
    Internal(String),
}

impl FormError {
    /// HTTP status of the re-rendered page.
    pub fn status(&self) -> StatusCode {
        match self {
            FormError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

/// A parsed, typed submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingRequest {
    pub spot: f64,
    pub strike: f64,
    pub maturity: f64,
    pub rate: f64,
    pub volatility: f64,
    pub steps: usize,
    pub paths: usize,
    pub seed: Option<u64>,
    pub mode: PayoffMode,
    pub expression: String,
}

fn or_default(value: &mut String, default: String) {
    if value.trim().is_empty() {
        *value = default;
    }
}

fn parse_float(field: &'static str, value: &str) -> Result<f64, FormError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
        .ok_or_else(|| FormError::NotANumber {
            field,
            value: value.to_string(),
        })
}

fn parse_count(field: &'static str, value: &str) -> Result<usize, FormError> {
    value.trim().parse().map_err(|_| FormError::NotAnInteger {
        field,
        value: value.to_string(),
    })
}

impl PriceForm {
    /// Replaces empty fields with the defaults; `seed` and `payoff_expr` may stay empty.
    pub fn with_defaults(mut self) -> Self {
        let defaults = PriceForm::default();
        or_default(&mut self.spot, defaults.spot);
        or_default(&mut self.strike, defaults.strike);
        or_default(&mut self.maturity, defaults.maturity);
        or_default(&mut self.risk_free_rate, defaults.risk_free_rate);
        or_default(&mut self.volatility, defaults.volatility);
        or_default(&mut self.steps, defaults.steps);
        or_default(&mut self.paths, defaults.paths);
        or_default(&mut self.payoff_mode, defaults.payoff_mode);
        self
    }

    /// Parses every field; range checks are left to the engine.
    pub fn to_request(&self) -> Result<PricingRequest, FormError> {
        let seed = match self.seed.trim() {
            "" => None,
            s => Some(s.parse().map_err(|_| FormError::NotAnInteger {
                field: "seed",
                value: self.seed.clone(),
            })?),
        };

        Ok(PricingRequest {
            spot: parse_float("spot", &self.spot)?,
            strike: parse_float("strike", &self.strike)?,
            maturity: parse_float("maturity", &self.maturity)?,
            rate: parse_float("risk_free_rate", &self.risk_free_rate)?,
            volatility: parse_float("volatility", &self.volatility)?,
            steps: parse_count("steps", &self.steps)?,
            paths: parse_count("paths", &self.paths)?,
            seed,
            mode: self.payoff_mode.parse()?,
            expression: self.payoff_expr.clone(),
        })
    }
}

impl PricingRequest {
    /// Rejects requests whose path grid is larger than `limit` prices.
    pub fn check_budget(&self, limit: u64) -> Result<(), FormError> {
        let requested = (self.paths as u64).saturating_mul(self.steps as u64);
        if requested > limit {
            return Err(FormError::OverBudget {
                paths: self.paths,
                steps: self.steps,
                limit,
            });
        }
        Ok(())
    }

    /// Builds the payoff and runs the simulation. CPU bound.
    pub fn price(&self) -> Result<MonteCarloResult, FormError> {
        let payoff: Box<dyn PathPayoff> = match self.mode {
            PayoffMode::Call => Box::new(VanillaPayoff::call(self.strike)),
            PayoffMode::Put => Box::new(VanillaPayoff::put(self.strike)),
            PayoffMode::Custom => Box::new(adapter_payoff::compile(&self.expression)?),
        };

        Ok(monte_carlo_price(
            payoff.as_ref(),
            self.spot,
            self.maturity,
            self.rate,
            self.volatility,
            self.steps,
            self.paths,
            self.seed,
        )?)
    }
}

/// Parses, budgets and prices one submission.
pub async fn price_form(form: &PriceForm, config: &ServerConfig) -> Result<MonteCarloResult, FormError> {
    let request = form.to_request()?;
    request.check_budget(config.max_path_steps)?;

    tokio::task::spawn_blocking(move || request.price())
        .await
        .map_err(|e| FormError::Internal(e.to_string()))?
}

/// Build the form routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(show_form).post(submit_form))
}

/// GET /
async fn show_form() -> Html<String> {
    Html(page::render(&PriceForm::default(), None))
}

/// POST /
async fn submit_form(
    State(state): State<AppState>,
    Form(form): Form<PriceForm>,
) -> (StatusCode, Html<String>) {
    let form = form.with_defaults();

    match price_form(&form, &state.config).await {
        Ok(result) => {
            info!(
                estimate = result.estimate,
                std_error = result.std_error,
                paths = result.n_paths,
                seed = result.seed,
                mode = %form.payoff_mode,
                "priced form submission"
            );
            let html = page::render(&form, Some(&Outcome::Priced(result)));
            (StatusCode::OK, Html(html))
        }
        Err(err) => {
            let status = err.status();
            let outcome = match &err {
                FormError::Internal(detail) => {
                    error!(detail = %detail, "pricing task failed");
                    let message = if state.config.environment.is_production() {
                        "internal error while pricing".to_string()
                    } else {
                        err.to_string()
                    };
                    Outcome::Failed {
                        message,
                        detail: None,
                    }
                }
                FormError::Expression(expr_err) => {
                    warn!(error = %err, "payoff expression rejected");
                    Outcome::Failed {
                        message: err.to_string(),
                        detail: Some(annotate_source(&form.payoff_expr, expr_err.span())),
                    }
                }
                _ => {
                    warn!(error = %err, "form submission rejected");
                    Outcome::Failed {
                        message: err.to_string(),
                        detail: None,
                    }
                }
            };
            (status, Html(page::render(&form, Some(&outcome))))
        }
    }
}
