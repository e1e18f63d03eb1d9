use serde::Deserialize;

use crate::provider::ProviderConfig;

/// Router configuration grouped by request modality
///
/// Only language (chat) routers exist today; the grouping leaves room for
/// other modalities without reshaping the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutersConfig {
    /// Language routers, in config order
    #[serde(default)]
    pub language: Vec<LangRouterConfig>,
}

/// Configuration for a single language router
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LangRouterConfig {
    /// Router identifier, unique across the gateway
    pub id: String,
    /// Model selection strategy
    #[serde(default)]
    pub strategy: RoutingStrategy,
    /// Retry policy for the routing loop
    #[serde(default)]
    pub retry: RetryConfig,
    /// Candidate models, in priority order
    pub models: Vec<LangModelConfig>,
}

/// Model selection strategy for a router
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingStrategy {
    /// Always prefer the first healthy model in config order
    #[default]
    Priority,
    /// Cycle through healthy models evenly
    RoundRobin,
    /// Smooth weighted interleaving by model weight
    WeightedRoundRobin,
    /// Prefer the model with the lowest per-token latency estimate
    LeastLatency,
}

/// Retry policy for the routing loop
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Maximum routing attempts per request; defaults to the number of
    /// configured models
    #[serde(default)]
    pub max_attempts: Option<usize>,
    /// Optional wall-clock budget per attempt (e.g. "30s")
    #[serde(default)]
    pub attempt_timeout: Option<String>,
}

/// Configuration for one candidate model inside a router
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LangModelConfig {
    /// Model identifier, unique within its router
    pub id: String,
    /// Relative share for weighted strategies
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Upstream provider for this model
    pub provider: ProviderConfig,
    /// Error budget throttling the model out of rotation after failures
    #[serde(default)]
    pub error_budget: ErrorBudgetConfig,
    /// Latency estimator settings
    #[serde(default)]
    pub latency: LatencyConfig,
}

/// Token-bucket error budget for a model
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorBudgetConfig {
    /// Maximum errors the model may absorb before leaving rotation
    #[serde(default = "default_budget")]
    pub budget: u64,
    /// Time to earn back one error token (e.g. "6s")
    #[serde(default = "default_time_per_token")]
    pub time_per_token: String,
}

impl Default for ErrorBudgetConfig {
    fn default() -> Self {
        Self {
            budget: default_budget(),
            time_per_token: default_time_per_token(),
        }
    }
}

/// Latency estimator settings for a model
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LatencyConfig {
    /// Weight of the newest sample once warmed up, in (0, 1)
    #[serde(default = "default_decay")]
    pub decay: f64,
    /// Samples accumulated as a plain mean before EWMA weighting engages
    #[serde(default = "default_warmup_samples")]
    pub warmup_samples: u64,
    /// Hint for external latency scrapers; unused by the routing algorithm
    #[serde(default)]
    pub update_interval: Option<String>,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            decay: default_decay(),
            warmup_samples: default_warmup_samples(),
            update_interval: None,
        }
    }
}

fn default_weight() -> u32 {
    1
}

fn default_budget() -> u64 {
    10
}

// Ten error tokens per minute
fn default_time_per_token() -> String {
    "6s".to_owned()
}

fn default_decay() -> f64 {
    0.06
}

fn default_warmup_samples() -> u64 {
    3
}
