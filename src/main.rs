use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use tracing_subscriber::{fmt, EnvFilter};

use picbed_relay::{config::DEFAULT_CONFIG_PATH, Config, RelayState};


/// picBed proxy for MWeb: commits uploaded images to a GitHub repository
#[derive(Parser, Debug)]
#[command(name = "picbed-relay", version, about)]
struct Args {
    /// Configuration file
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}


#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    drop(dotenv());

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load(&args.config)
        .with_context(|| format!("Could not load configuration from {}", args.config.display()))?;

    let state = RelayState::new(config).context("Failed to build HTTP client")?;
    picbed_relay::run(Arc::new(state)).await
}
