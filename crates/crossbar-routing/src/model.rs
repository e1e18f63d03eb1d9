//! A provider client wrapped with health and latency tracking

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbar_config::LangModelConfig;
use crossbar_core::RequestContext;
use crossbar_llm::{ChatRequest, ChatResponse, Provider, ProviderError};

use crate::health::{RateLimitTracker, TokenBucket};
use crate::latency::MovingAverage;

/// One candidate model inside a router
///
/// Wraps the provider client with the state the routing loop consults: a
/// rate-limit cooldown, a token-bucket error budget, and a per-token latency
/// estimate. All health mutation happens here, inside [`LangModel::chat`];
/// the router only reads.
pub struct LangModel {
    model_id: String,
    weight: u32,
    client: Arc<dyn Provider>,
    rate_limit: RateLimitTracker,
    error_budget: TokenBucket,
    latency: MovingAverage,
    latency_update_interval: Option<Duration>,
}

impl LangModel {
    /// Build a model from its configuration and an already-constructed client
    pub fn from_config(config: &LangModelConfig, client: Arc<dyn Provider>) -> anyhow::Result<Self> {
        let time_per_token = parse_duration(&config.error_budget.time_per_token, &config.id)?;

        let latency_update_interval = config
            .latency
            .update_interval
            .as_deref()
            .map(|interval| parse_duration(interval, &config.id))
            .transpose()?;

        Ok(Self {
            model_id: config.id.clone(),
            weight: config.weight,
            client,
            rate_limit: RateLimitTracker::new(),
            error_budget: TokenBucket::new(config.error_budget.budget, time_per_token),
            latency: MovingAverage::new(config.latency.decay, config.latency.warmup_samples),
            latency_update_interval,
        })
    }

    /// Stable identifier, unique within the owning router
    pub fn id(&self) -> &str {
        &self.model_id
    }

    /// Vendor tag of the wrapped client
    pub fn provider(&self) -> &str {
        self.client.provider()
    }

    /// Relative share for weighted strategies
    pub const fn weight(&self) -> u32 {
        self.weight
    }

    /// Per-token latency estimate
    pub const fn latency(&self) -> &MovingAverage {
        &self.latency
    }

    /// Hint for external latency scrapers; unused by the routing loop
    pub const fn latency_update_interval(&self) -> Option<Duration> {
        self.latency_update_interval
    }

    /// Whether the routing loop may select this model
    ///
    /// A model is healthy when it is outside any rate-limit cooldown and
    /// its error budget still has tokens.
    pub fn healthy(&self) -> bool {
        !self.rate_limit.limited() && self.error_budget.has_tokens()
    }

    /// Invoke the wrapped client, absorbing health and latency signals
    ///
    /// On success the response is stamped with this model's id and, when the
    /// provider reported a non-zero response token count, one per-token
    /// latency sample is recorded. A zero token count skips the sample.
    ///
    /// On failure the original error is re-raised unchanged: a rate limit
    /// starts a cooldown without touching the error budget (it is a request
    /// to back off, not a quality signal), every other error costs one
    /// budget token. An empty bucket surfaces through `healthy()` on the
    /// next filter pass, so the `take` result is deliberately discarded.
    pub async fn chat(&self, request: &ChatRequest, context: &RequestContext) -> Result<ChatResponse, ProviderError> {
        let started_at = Instant::now();

        match self.client.chat(request, context).await {
            Ok(mut response) => {
                let response_tokens = response.model_response.token_usage.response_tokens;

                if response_tokens > 0 {
                    let elapsed = started_at.elapsed().as_nanos() as f64;
                    self.latency.add(elapsed / f64::from(response_tokens));
                }

                response.model_id = self.model_id.clone();

                Ok(response)
            }
            Err(error) => {
                if let Some(until_reset) = error.until_reset() {
                    tracing::warn!(
                        model = %self.model_id,
                        cooldown = ?until_reset,
                        "model rate limited, starting cooldown"
                    );
                    self.rate_limit.set_limited(until_reset);
                } else {
                    let _ = self.error_budget.take(1);
                }

                Err(error)
            }
        }
    }
}

impl std::fmt::Debug for LangModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LangModel")
            .field("model_id", &self.model_id)
            .field("provider", &self.client.provider())
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

fn parse_duration(value: &str, model_id: &str) -> anyhow::Result<Duration> {
    duration_str::parse(value).map_err(|e| anyhow::anyhow!("model '{model_id}' has invalid duration '{value}': {e}"))
}
