//! # Donation Hub
//!
//! Entry point. See the `hub_runtime` library for the startup sequence.

use anyhow::{Context, Result};
use hub_runtime::{build_hub, shutdown_signal, HubConfig};
use hub_telemetry::init_telemetry;
use shared_types::SystemClock;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = HubConfig::from_env().context("failed to load configuration")?;

    let _telemetry =
        init_telemetry(&config.telemetry).context("failed to initialize telemetry")?;

    let hub = build_hub(&config, Arc::new(SystemClock))
        .await
        .context("failed to assemble the hub")?;

    info!("Donation Hub is running. Press Ctrl+C to stop.");
    hub.gateway
        .run(shutdown_signal())
        .await
        .context("API gateway failed")?;

    info!("shutdown complete");
    Ok(())
}
