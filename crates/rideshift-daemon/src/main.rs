//! RideShift Daemon - rideshare demo service
//!
//! The RideShift daemon provides:
//! - REST API for rides, drivers, users and commission governance
//! - Mock payment, NFT, maps and realtime endpoints
//! - In-memory registries, optionally seeded with demo records

use clap::Parser;
use rideshift_daemon::error::{DaemonError, DaemonResult};
use rideshift_daemon::{DaemonConfig, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// RideShift Daemon CLI
#[derive(Parser)]
#[command(name = "rideshiftd")]
#[command(about = "RideShift Daemon - rideshare demo service", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "RIDESHIFT_CONFIG")]
    config: Option<String>,

    /// Listen address (overrides server.listen_addr)
    #[arg(short, long)]
    listen: Option<String>,

    /// Log level (overrides logging.level)
    #[arg(long)]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long)]
    log_json: bool,

    /// Start with empty registries
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config =
        DaemonConfig::load(cli.config.as_deref()).map_err(|e| DaemonError::Config(e.to_string()))?;

    // Override with CLI args
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.log_json {
        config.logging.json = true;
    }
    if cli.no_seed {
        config.storage.seed_demo_data = false;
    }

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    println!(
        r#"
  RideShift - rideshare with community-set commission
  Version: {}
  Listening: {}
"#,
        env!("CARGO_PKG_VERSION"),
        config.server.listen_addr
    );

    let server = Server::new(config)?;
    server.run().await
}
