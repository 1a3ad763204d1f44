//! send-eth service binary.
//!
//! ```text
//!     Client ──HTTP──▶ ┌──────────────┐      ┌──────────────────┐
//!                      │  http front  │─────▶│ transfer handler │
//!     Client ◀──bool── │ (axum/tower) │◀─────│ nonce→fee→sign   │
//!                      └──────────────┘      └────────┬─────────┘
//!                                                     │ WebSocket
//!                                                     ▼
//!                                               Ethereum node
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use send_eth::config::{load_config, ObservabilityConfig};
use send_eth::lifecycle;
use send_eth::observability::init_logging;

#[derive(Parser)]
#[command(name = "send-eth")]
#[command(about = "Sign and submit ETH transfers", long_about = None)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "SEND_ETH_CONFIG", default_value = "config/config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&ObservabilityConfig::default());
            tracing::error!(path = %args.config.display(), error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    match lifecycle::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal startup error");
            ExitCode::FAILURE
        }
    }
}
