#![allow(clippy::must_use_candidate)]

mod env;
mod loader;
pub mod provider;
pub mod routers;
pub mod server;
pub mod telemetry;

use serde::Deserialize;

pub use provider::*;
pub use routers::*;
pub use server::*;
pub use telemetry::TelemetryConfig;

/// Top-level crossbar configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Router configuration
    #[serde(default)]
    pub routers: RoutersConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
