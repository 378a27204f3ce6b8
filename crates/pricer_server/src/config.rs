//! Server configuration management
//!
//! Sources, lowest to highest priority: built-in defaults, a TOML file,
//! `PRICER_*` environment variables, command-line flags.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable names read by [`ServerConfig::apply_env`].
pub mod env {
    /// Bind address.
    pub const HOST: &str = "PRICER_SERVER_HOST";
    /// Listen port.
    pub const PORT: &str = "PRICER_SERVER_PORT";
    /// Log level.
    pub const LOG_LEVEL: &str = "PRICER_LOG_LEVEL";
    /// Deployment environment.
    pub const ENVIRONMENT: &str = "PRICER_ENV";
    /// Upper bound on paths × steps per request.
    pub const MAX_PATH_STEPS: &str = "PRICER_MAX_PATH_STEPS";
}

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid port number: {0}. Must be between 1 and 65535")]
    InvalidPort(String),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid environment: {0}. Must be one of: development, staging, production")]
    InvalidEnvironment(String),

    #[error("Invalid simulation budget: {0}. Must be a positive integer")]
    InvalidBudget(String),

    #[error("Configuration file error in {path}: {message}")]
    FileError { path: String, message: String },
}

/// Log levels supported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, <LogLevel as TryFrom<String>>::Error> {
        value.parse()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter_str())
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Production hides internal error details from the page.
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidEnvironment(s.to_string())),
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Staging => f.write_str("staging"),
            Environment::Production => f.write_str("production"),
        }
    }
}

/// Default cap on `paths × steps` for a single form submission.
pub const DEFAULT_MAX_PATH_STEPS: u64 = 50_000_000;

/// Server configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Log level, overridden by `RUST_LOG`
    pub log_level: LogLevel,
    /// Deployment environment
    pub environment: Environment,
    /// Largest `paths × steps` a request may ask for
    pub max_path_steps: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: LogLevel::Info,
            environment: Environment::Development,
            max_path_steps: DEFAULT_MAX_PATH_STEPS,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file; unspecified keys keep defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file_error = |message: String| ConfigError::FileError {
            path: path.display().to_string(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
        let config: ServerConfig = toml::from_str(&content).map_err(|e| file_error(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides fields from environment variables, looked up through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(env::HOST) {
            self.host = host;
        }
        if let Some(port) = lookup(env::PORT) {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidPort(port))?;
        }
        if let Some(level) = lookup(env::LOG_LEVEL) {
            self.log_level = level.parse()?;
        }
        if let Some(environment) = lookup(env::ENVIRONMENT) {
            self.environment = environment.parse()?;
        }
        if let Some(budget) = lookup(env::MAX_PATH_STEPS) {
            self.max_path_steps = budget
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidBudget(budget))?;
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(level) = &cli.log_level {
            self.log_level = level.parse()?;
        }
        if let Some(budget) = cli.max_path_steps {
            self.max_path_steps = budget;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port.to_string()));
        }
        if self.max_path_steps == 0 {
            return Err(ConfigError::InvalidBudget("0".to_string()));
        }
        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Overrides taken from the command line
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Host address override
    pub host: Option<String>,
    /// Port override
    pub port: Option<u16>,
    /// Log level override
    pub log_level: Option<String>,
    /// Simulation budget override
    pub max_path_steps: Option<u64>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<ServerConfig, ConfigError> {
    build_config_with(cli, |key| std::env::var(key).ok())
}

/// [`build_config`] with an explicit environment lookup.
pub fn build_config_with<F>(cli: &CliArgs, lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config_file {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };

    config.apply_env(lookup)?;
    config.merge_with_cli(cli)?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.max_path_steps, DEFAULT_MAX_PATH_STEPS);
    }

    #[test]
    fn test_level_and_environment_parsing() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());

        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("stage".parse::<Environment>().unwrap(), Environment::Staging);
        assert!("qa".parse::<Environment>().is_err());
        assert!(Environment::Production.is_production());
        assert!(!Environment::Staging.is_production());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            port = 9000
            log_level = "debug"
            max_path_steps = 1000
            "#,
        )
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.max_path_steps, 1000);
    }

    #[test]
    fn test_bad_level_in_toml_is_rejected() {
        let err = toml::from_str::<ServerConfig>(r#"log_level = "chatty""#).unwrap_err();
        assert!(err.to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_env_overrides_defaults() {
        let mut config = ServerConfig::default();
        config
            .apply_env(vars(&[
                (env::HOST, "127.0.0.1"),
                (env::PORT, "3000"),
                (env::ENVIRONMENT, "production"),
                (env::MAX_PATH_STEPS, "12345"),
            ]))
            .unwrap();

        assert_eq!(config.socket_addr(), "127.0.0.1:3000");
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.max_path_steps, 12345);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_bad_env_values() {
        let mut config = ServerConfig::default();
        assert!(matches!(
            config.apply_env(vars(&[(env::PORT, "eighty")])),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            config.apply_env(vars(&[(env::MAX_PATH_STEPS, "-1")])),
            Err(ConfigError::InvalidBudget(_))
        ));
    }

    #[test]
    fn test_cli_beats_env() {
        let cli = CliArgs {
            port: Some(9999),
            log_level: Some("trace".to_string()),
            ..Default::default()
        };
        let config =
            build_config_with(&cli, vars(&[(env::PORT, "3000"), (env::LOG_LEVEL, "error")]))
                .unwrap();

        assert_eq!(config.port, 9999);
        assert_eq!(config.log_level, LogLevel::Trace);
    }

    #[test]
    fn test_validation() {
        let mut config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.port = 8080;
        config.max_path_steps = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let cli = CliArgs {
            config_file: Some(PathBuf::from("/nonexistent/pricer.toml")),
            ..Default::default()
        };
        let err = build_config_with(&cli, |_| None).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/pricer.toml"));
    }
}
