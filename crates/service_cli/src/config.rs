//! CLI configuration file.
//!
//! `optpricer` reads defaults for every market and simulation flag from a
//! TOML file with two optional sections:
//!
//! ```toml
//! [market]
//! spot = 100.0
//! strike = 100.0
//! maturity = 1.0
//! rate = 0.05
//! volatility = 0.2
//!
//! [simulation]
//! steps = 252
//! paths = 20000
//! tree_steps = 200
//! seed = 7
//! parallel = true
//! ```
//!
//! A missing file means built-in defaults; flags always win over the file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, Result};

/// Market inputs shared by both engines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSection {
    pub spot: f64,
    pub strike: f64,
    pub maturity: f64,
    pub rate: f64,
    pub volatility: f64,
}

impl Default for MarketSection {
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

/// Discretisation and sampling settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSection {
    /// Monte Carlo time steps per path.
    pub steps: usize,
    /// Monte Carlo paths.
    pub paths: usize,
    /// Binomial lattice steps.
    pub tree_steps: usize,
    /// Master seed; unseeded runs draw one from entropy.
    pub seed: Option<u64>,
    /// Simulate path blocks on the rayon pool.
    pub parallel: bool,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            steps: 252,
            paths: 20_000,
            tree_steps: 200,
            seed: None,
            parallel: true,
        }
    }
}

/// Contents of `optpricer.toml`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub market: MarketSection,
    pub simulation: SimulationSection,
}

impl CliConfig {
    /// Loads the file at `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| CliError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml(&content).map_err(|message| CliError::Config {
            path: path.display().to_string(),
            message,
        })?;

        debug!(path = %path.display(), ?config, "loaded config file");
        Ok(config)
    }

    fn from_toml(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}
