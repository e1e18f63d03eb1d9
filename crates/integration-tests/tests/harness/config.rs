//! Programmatic config construction for tests

use crossbar_config::{
    ChatParams, Config, ErrorBudgetConfig, HealthConfig, LangModelConfig, LangRouterConfig, LatencyConfig,
    OpenAiConfig, ProviderConfig, RetryConfig, RoutersConfig, RoutingStrategy, ServerConfig,
};

/// Builder assembling a gateway [`Config`] for tests
#[derive(Default)]
pub struct ConfigBuilder {
    routers: Vec<LangRouterConfig>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a language router
    pub fn with_router(mut self, router: LangRouterConfig) -> Self {
        self.routers.push(router);
        self
    }

    pub fn build(self) -> Config {
        Config {
            server: ServerConfig {
                listen_address: Some("127.0.0.1:0".parse().expect("valid address")),
                health: HealthConfig::default(),
            },
            routers: RoutersConfig {
                language: self.routers,
            },
            telemetry: None,
        }
    }
}

/// A router over the given models
pub fn router(id: &str, strategy: RoutingStrategy, models: Vec<LangModelConfig>) -> LangRouterConfig {
    LangRouterConfig {
        id: id.to_owned(),
        strategy,
        retry: RetryConfig::default(),
        models,
    }
}

/// A model served by an OpenAI-compatible mock at `base_url`
pub fn openai_model(id: &str, base_url: &str, weight: u32) -> LangModelConfig {
    LangModelConfig {
        id: id.to_owned(),
        weight,
        provider: ProviderConfig::Openai(OpenAiConfig {
            api_key: "sk-test".into(),
            base_url: Some(base_url.parse().expect("valid mock URL")),
            model: "mock-model-1".to_owned(),
            default_params: ChatParams::default(),
        }),
        error_budget: ErrorBudgetConfig::default(),
        latency: LatencyConfig::default(),
    }
}

/// Same as [`openai_model`] with a custom error budget
pub fn openai_model_with_budget(id: &str, base_url: &str, budget: u64, time_per_token: &str) -> LangModelConfig {
    let mut model = openai_model(id, base_url, 1);
    model.error_budget = ErrorBudgetConfig {
        budget,
        time_per_token: time_per_token.to_owned(),
    };
    model
}
