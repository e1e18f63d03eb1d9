use std::net::SocketAddr;

use serde::Deserialize;

/// HTTP server configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen address (defaults to 0.0.0.0:9099)
    #[serde(default)]
    pub listen_address: Option<SocketAddr>,
    /// Health endpoint configuration
    #[serde(default)]
    pub health: HealthConfig,
}

/// Health endpoint configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthConfig {
    /// Whether the health endpoint is served
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    /// Path the health endpoint is mounted at
    #[serde(default = "default_health_path")]
    pub path: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            path: default_health_path(),
        }
    }
}

fn default_health_enabled() -> bool {
    true
}

fn default_health_path() -> String {
    "/v1/health".to_owned()
}
