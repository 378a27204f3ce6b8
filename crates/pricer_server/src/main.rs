//! Pricer Server
//!
//! Web form front end for Monte Carlo option pricing.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pricer_server::config::{build_config, CliArgs as ConfigCliArgs};
use pricer_server::server::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pricer Server - HTML form for Monte Carlo option pricing
#[derive(Parser, Debug)]
#[command(name = "pricer_server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Host address to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Largest paths × steps a single request may simulate
    #[arg(long)]
    max_path_steps: Option<u64>,
}

impl From<Args> for ConfigCliArgs {
    fn from(args: Args) -> Self {
        ConfigCliArgs {
            config_file: args.config,
            host: args.host,
            port: args.port,
            log_level: args.log_level,
            max_path_steps: args.max_path_steps,
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli_args: ConfigCliArgs = Args::parse().into();
    let config = build_config(&cli_args).context("failed to load server configuration")?;

    init_tracing(config.log_level.as_filter_str());

    tracing::info!("Pricer Server v{}", pricer_server::VERSION);
    tracing::info!(
        host = %config.host,
        port = %config.port,
        log_level = %config.log_level,
        environment = %config.environment,
        max_path_steps = config.max_path_steps,
        "Server configuration loaded"
    );

    let addr = config.socket_addr();
    Server::new(config)
        .run()
        .await
        .with_context(|| format!("server on {} failed", addr))
}
