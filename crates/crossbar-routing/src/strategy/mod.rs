//! Model selection strategies
//!
//! A strategy picks one model from the healthy snapshot the router hands it
//! on every attempt. Strategies may keep internal cursor state; every pick
//! is an O(n) critical section and safe under concurrent router calls.

pub mod least_latency;
pub mod priority;
pub mod round_robin;
pub mod weighted_round_robin;

use std::sync::Arc;

use crossbar_config::RoutingStrategy;

use crate::model::LangModel;

pub use least_latency::LeastLatency;
pub use priority::Priority;
pub use round_robin::RoundRobin;
pub use weighted_round_robin::WeightedRoundRobin;

/// Trait for model selection strategies
pub trait Strategy: Send + Sync {
    /// Select one model from a snapshot of healthy candidates
    ///
    /// Returns `None` only for an empty snapshot; the router treats that as
    /// no models available.
    fn pick(&self, healthy: &[Arc<LangModel>]) -> Option<Arc<LangModel>>;

    /// Strategy name as it appears in configuration
    fn name(&self) -> &'static str;
}

/// Construct the configured strategy
pub fn from_config(strategy: RoutingStrategy) -> Box<dyn Strategy> {
    match strategy {
        RoutingStrategy::Priority => Box::new(Priority),
        RoutingStrategy::RoundRobin => Box::new(RoundRobin::new()),
        RoutingStrategy::WeightedRoundRobin => Box::new(WeightedRoundRobin::new()),
        RoutingStrategy::LeastLatency => Box::new(LeastLatency),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use async_trait::async_trait;
    use crossbar_config::{ErrorBudgetConfig, LangModelConfig, LatencyConfig, ProviderConfig};
    use crossbar_core::RequestContext;
    use crossbar_llm::{ChatRequest, ChatResponse, Provider, ProviderError};

    use crate::model::LangModel;

    /// Provider stub that never gets called; strategies only look at model
    /// metadata, never at the client.
    struct InertProvider;

    #[async_trait]
    impl Provider for InertProvider {
        fn provider(&self) -> &str {
            "inert"
        }

        async fn chat(
            &self,
            _request: &ChatRequest,
            _context: &RequestContext,
        ) -> Result<ChatResponse, ProviderError> {
            Err(ProviderError::Transport("inert provider".to_owned()))
        }
    }

    pub(crate) fn model_config(id: &str, weight: u32) -> LangModelConfig {
        LangModelConfig {
            id: id.to_owned(),
            weight,
            provider: ProviderConfig::Openai(crossbar_config::OpenAiConfig {
                api_key: "sk-test".into(),
                base_url: None,
                model: "test-model".to_owned(),
                default_params: crossbar_config::ChatParams::default(),
            }),
            error_budget: ErrorBudgetConfig::default(),
            latency: LatencyConfig::default(),
        }
    }

    pub(crate) fn model(id: &str, weight: u32) -> Arc<LangModel> {
        Arc::new(LangModel::from_config(&model_config(id, weight), Arc::new(InertProvider)).unwrap())
    }
}
