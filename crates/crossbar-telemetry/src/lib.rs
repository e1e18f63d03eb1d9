//! Telemetry for crossbar
//!
//! Sets up logging via the `tracing` ecosystem and exposes metric helpers
//! over the OpenTelemetry API. Wiring an exporter is the deployment's
//! concern; without one the metric calls are no-ops.

pub mod metrics;

use crossbar_config::TelemetryConfig;

pub use opentelemetry::{
    KeyValue,
    metrics::{Counter, Histogram, Meter},
};

/// Initialize logging from configuration
///
/// The config's `log_filter` takes effect unless `RUST_LOG` overrides it.
///
/// # Errors
///
/// Returns an error if a subscriber is already installed
pub fn init(config: Option<&TelemetryConfig>) -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let default_filter = config.map_or("info", |c| c.log_filter.as_str());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    Ok(())
}

/// Meter for gateway-level instruments
pub fn meter() -> Meter {
    opentelemetry::global::meter("crossbar")
}
