//! Provider trait and upstream client implementations

pub mod anthropic;
pub mod openai;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use crossbar_config::ProviderConfig;
use crossbar_core::RequestContext;

use crate::error::ProviderError;
use crate::types::{ChatRequest, ChatResponse};

/// Trait implemented by each upstream provider client
///
/// Clients own their transport details and surface only the normalized
/// error kinds in [`ProviderError`]. Transport-level retries, if any, are a
/// client's private concern.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Vendor tag for telemetry (e.g. "openai")
    fn provider(&self) -> &str;

    /// Send a chat request and return the unified response
    async fn chat(&self, request: &ChatRequest, context: &RequestContext) -> Result<ChatResponse, ProviderError>;
}

/// Construct a provider client from configuration
pub fn build_provider(config: &ProviderConfig) -> Arc<dyn Provider> {
    match config {
        ProviderConfig::Openai(openai_config) => Arc::new(openai::OpenAiProvider::new(openai_config)),
        ProviderConfig::Anthropic(anthropic_config) => Arc::new(anthropic::AnthropicProvider::new(anthropic_config)),
    }
}

/// Parse a `Retry-After` header into a backoff duration
///
/// Only the delta-seconds form is honored; HTTP-date values are ignored and
/// the caller falls back to its default cooldown.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Generate a gateway-side response identifier
pub(crate) fn response_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let count = COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("{now:x}-{count:04x}")
}

/// Current unix timestamp in seconds
pub(crate) fn unix_now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
