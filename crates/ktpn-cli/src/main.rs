//! `ktpn` - look up traffic violations for a plate number.
//!
//! Prints the violations as JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use ktpn_core::{AppConfig, VehicleType};
use ktpn_portal::{retry, Portal, Violation};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "ktpn")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Look up traffic violations for a vehicle plate", long_about = None)]
struct Cli {
    /// Plate number, e.g. 29A-123.45
    plate: String,

    /// Vehicle type, by name or portal code
    #[arg(short = 't', long, default_value = "car")]
    vehicle_type: VehicleType,

    /// Config file (default: ~/.config/ktpn/config.toml)
    #[arg(short, long, env = "KTPN_CONFIG")]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize tracing subscriber for logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose {
        "warn,ktpn=debug,ktpn_core=debug,ktpn_portal=debug"
    } else {
        "warn,ktpn=info,ktpn_portal=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn render(violations: &[Violation], pretty: bool) -> Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(violations)
    } else {
        serde_json::to_string(violations)
    };
    out.context("failed to serialize violations")
}

async fn run(cli: Cli) -> Result<String> {
    let config =
        AppConfig::load_with_env(cli.config.as_deref()).context("failed to load configuration")?;
    let portal = Portal::new(&config);

    info!(
        "Looking up {} (vehicle type {}) with up to {} attempts",
        cli.plate, cli.vehicle_type, config.lookup.max_attempts
    );

    let violations = retry(config.lookup.max_attempts, || {
        portal.lookup(&cli.plate, cli.vehicle_type)
    })
    .await
    .with_context(|| format!("lookup for {} failed", cli.plate))?;

    render(&violations, cli.pretty)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
