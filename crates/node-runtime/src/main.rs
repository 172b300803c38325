//! # NexxGate Node
//!
//! Entry point for an access-control gate.
//!
//! 1. Load configuration from `NG_*` environment variables
//! 2. Refuse to start without a trusted edge key
//! 3. Build subsystems, restore the access list, sync with the edge
//! 4. Authenticate tags read from stdin until Ctrl+C

use anyhow::{Context, Result};
use node_runtime::adapters::LineTagReader;
use node_runtime::{load_config, GateContainer, GateRuntime};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging() -> Result<()> {
    let filter = std::env::var("NG_LOG_LEVEL")
        .ok()
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let config = load_config();
    config
        .validate_for_production()
        .context("Configuration rejected")?;

    let container = GateContainer::new(config).context("Failed to build gate")?;
    let runtime = GateRuntime::new(container);
    runtime.start().await;

    let scanner = runtime.spawn_scanner(LineTagReader::stdin());
    info!("Gate is running. One tag per line on stdin, Ctrl+C to stop.");

    tokio::select! {
        signal = tokio::signal::ctrl_c() => signal.context("Failed to listen for Ctrl+C")?,
        _ = scanner => info!("Tag input closed"),
    }

    runtime.shutdown().await;
    Ok(())
}
