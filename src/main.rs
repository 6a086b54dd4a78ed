//! KeepAlive
//!
//! Command-line entry point: resolves manufacturer keep-alive settings
//! and inspects their state on a connected device.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use keepalive::commands::{DevicesCommand, InspectCommand, ResolveCommand, ValidateCommand};
use keepalive_core::{AppConfig, APP_NAME, VERSION};

#[derive(Parser)]
#[command(name = "keepalive", version, about = "Manufacturer keep-alive settings resolver")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of configuration documents, overrides the config file
    #[arg(long, global = true)]
    assets: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the capability list for a manufacturer without a device
    Resolve {
        manufacturer: String,
        /// Firmware version to resolve against
        #[arg(long)]
        firmware: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Check every configuration document
    Validate { dir: Option<PathBuf> },
    /// List connected devices
    Devices,
    /// Resolve and check capabilities of a package on a device
    Inspect {
        #[arg(short, long)]
        serial: Option<String>,
        #[arg(short, long)]
        package: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path).await?,
        None => AppConfig::load().await?,
    };
    if let Some(assets) = cli.assets {
        config.assets_dir = Some(assets);
    }

    init_logging(&config, cli.verbose);
    debug!("{} v{} starting", APP_NAME, VERSION);

    match cli.command {
        Command::Resolve { manufacturer, firmware, json } => {
            ResolveCommand { manufacturer, firmware, json }.execute(&config)
        }
        Command::Validate { dir } => ValidateCommand { dir }.execute(&config),
        Command::Devices => DevicesCommand.execute(&config).await,
        Command::Inspect { serial, package, json } => {
            InspectCommand { serial, package, json }.execute(&config).await
        }
    }
}

/// Initialize logging; `RUST_LOG` wins over the configured level
fn init_logging(config: &AppConfig, verbose: bool) {
    let default_level = if verbose { "debug" } else { config.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
