//! Web form front end for the Monte Carlo option pricer
//!
//! Serves a single HTML page: `GET /` renders the pricing form, `POST /`
//! runs a simulation and renders the form again with the price and its 95%
//! confidence interval, or with the error. Custom payoffs are compiled by
//! `adapter_payoff`, so user text never reaches anything but the restricted
//! expression language.

pub mod config;
pub mod routes;
pub mod server;

/// Server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
