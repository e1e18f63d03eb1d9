//! The routing loop

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crossbar_config::LangRouterConfig;
use crossbar_core::RequestContext;
use crossbar_llm::{ChatRequest, ChatResponse, ProviderError, build_provider};

use crate::error::RouterError;
use crate::model::LangModel;
use crate::strategy::{self, Strategy};

/// A named group of interchangeable models addressed as one endpoint
///
/// Owns the candidate list and the selection strategy, and runs the retry
/// loop: filter to healthy models, let the strategy pick, invoke, and on a
/// recoverable failure move on to an alternate. Health accounting lives
/// entirely inside [`LangModel::chat`]; the router only reads `healthy()`.
pub struct LangRouter {
    router_id: String,
    models: Vec<Arc<LangModel>>,
    strategy: Box<dyn Strategy>,
    max_attempts: usize,
    attempt_timeout: Option<Duration>,
}

impl LangRouter {
    /// Build a router and its models from configuration
    pub fn from_config(config: &LangRouterConfig) -> anyhow::Result<Self> {
        let models = config
            .models
            .iter()
            .map(|model_config| {
                let client = build_provider(&model_config.provider);
                Ok(Arc::new(LangModel::from_config(model_config, client)?))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        // One shot per model by default; config may lower or raise the cap
        let max_attempts = config.retry.max_attempts.unwrap_or(models.len()).max(1);

        let attempt_timeout = config
            .retry
            .attempt_timeout
            .as_deref()
            .map(|timeout| {
                duration_str::parse(timeout)
                    .map_err(|e| anyhow::anyhow!("router '{}' has invalid attempt_timeout: {e}", config.id))
            })
            .transpose()?;

        Ok(Self::new(
            config.id.clone(),
            models,
            strategy::from_config(config.strategy),
            max_attempts,
            attempt_timeout,
        ))
    }

    /// Assemble a router from already-built parts
    pub fn new(
        router_id: String,
        models: Vec<Arc<LangModel>>,
        strategy: Box<dyn Strategy>,
        max_attempts: usize,
        attempt_timeout: Option<Duration>,
    ) -> Self {
        Self {
            router_id,
            models,
            strategy,
            max_attempts: max_attempts.max(1),
            attempt_timeout,
        }
    }

    /// Router identifier
    pub fn id(&self) -> &str {
        &self.router_id
    }

    /// Name of the configured selection strategy
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Configured models, in config order
    pub fn models(&self) -> &[Arc<LangModel>] {
        &self.models
    }

    /// Serve one chat request, failing over across candidates
    ///
    /// The healthy set is re-filtered on every attempt because the model
    /// that just failed may have dropped out of it. A model is attempted at
    /// most once per call; when every healthy model has been tried the loop
    /// ends early rather than burning the remaining attempts on known-bad
    /// candidates.
    pub async fn chat(&self, request: &ChatRequest, context: &RequestContext) -> Result<ChatResponse, RouterError> {
        let mut tried: HashSet<String> = HashSet::new();
        let mut last_error: Option<ProviderError> = None;

        for attempt in 0..self.max_attempts {
            if context.cancelled() {
                return Err(RouterError::Cancelled);
            }

            let healthy: Vec<Arc<LangModel>> = self
                .models
                .iter()
                .filter(|model| model.healthy())
                .cloned()
                .collect();

            if healthy.is_empty() {
                tracing::warn!(router = %self.router_id, "no healthy models to serve the request");
                return Err(RouterError::NoModelsAvailable);
            }

            let candidates: Vec<Arc<LangModel>> = healthy
                .into_iter()
                .filter(|model| !tried.contains(model.id()))
                .collect();

            let Some(model) = self.strategy.pick(&candidates) else {
                // Every healthy model has already failed this call
                break;
            };

            tried.insert(model.id().to_owned());

            match self.attempt(&model, request, context).await {
                Ok(mut response) => {
                    response.router_id = self.router_id.clone();
                    return Ok(response);
                }
                Err(ProviderError::Cancelled) => return Err(RouterError::Cancelled),
                Err(error) => {
                    tracing::warn!(
                        router = %self.router_id,
                        model = %model.id(),
                        provider = %model.provider(),
                        attempt,
                        error = %error,
                        "model failed, trying an alternate"
                    );
                    last_error = Some(error);
                }
            }
        }

        tracing::error!(
            router = %self.router_id,
            attempts = self.max_attempts,
            "no model produced a response"
        );

        Err(RouterError::AllModelsUnavailable { last_error })
    }

    /// Run a single model attempt under the optional per-attempt budget
    ///
    /// A timed-out attempt abandons the provider call without observing its
    /// outcome, so the model's health is left alone and the loop moves on.
    async fn attempt(
        &self,
        model: &Arc<LangModel>,
        request: &ChatRequest,
        context: &RequestContext,
    ) -> Result<ChatResponse, ProviderError> {
        match self.attempt_timeout {
            Some(timeout) => tokio::time::timeout(timeout, model.chat(request, context))
                .await
                .unwrap_or_else(|_| Err(ProviderError::Transport("attempt timed out".to_owned()))),
            None => model.chat(request, context).await,
        }
    }
}

impl std::fmt::Debug for LangRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LangRouter")
            .field("router_id", &self.router_id)
            .field("strategy", &self.strategy.name())
            .field("models", &self.models.len())
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}
