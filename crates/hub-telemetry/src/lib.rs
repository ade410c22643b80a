//! # Hub Telemetry
//!
//! Observability for the Donation Hub: structured logs through `tracing`
//! and counters in a Prometheus registry scraped from `GET /metrics`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hub_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::default().with_env_overrides();
//! let _guard = init_telemetry(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RUST_LOG` | unset | Full `EnvFilter` directive, wins over the configured level |
//! | `HUB_LOG_LEVEL` | `info` | Level used when `RUST_LOG` is unset |
//! | `HUB_LOG_FORMAT` | `pretty` | `json` switches to one JSON object per line |
//! | `HUB_SERVICE_NAME` | `donation-hub` | Recorded on the startup line |

mod config;
mod logging;
pub mod metrics;

pub use config::{LogFormat, TelemetryConfig};
pub use metrics::{
    gather_text, register_metrics, DONATIONS_CREATED, DONATION_TRANSITIONS,
    HTTP_REQUESTS, HTTP_REQUEST_DURATION, NEARBY_QUERIES, REGISTRY, REQUEST_TRANSITIONS,
    STORE_RETRIES, VOLUNTEER_REQUESTS,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("failed to install log subscriber: {0}")]
    LoggingInit(String),

    #[error("failed to register metrics: {0}")]
    MetricsInit(String),

    #[error("invalid telemetry configuration: {0}")]
    Config(String),
}

/// Install the log subscriber and register every metric.
///
/// Hold the returned guard for the lifetime of the process.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    config.validate()?;
    register_metrics()?;
    logging::init_logging(config)?;

    tracing::info!(
        service = %config.service_name,
        format = %config.log_format,
        level = %config.log_level,
        "telemetry initialized"
    );
    Ok(TelemetryGuard {
        service_name: config.service_name.clone(),
    })
}

/// Keeps telemetry active. Logs a final line on drop.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "shutting down telemetry");
    }
}
