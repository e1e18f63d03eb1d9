//! Anthropic Messages API provider client

use async_trait::async_trait;
use crossbar_config::{AnthropicConfig, ChatParams};
use crossbar_core::RequestContext;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{Provider, parse_retry_after, response_id, unix_now};
use crate::error::ProviderError;
use crate::types::{ChatMessage, ChatRequest, ChatResponse, ModelResponse, TokenUsage};

/// Default Anthropic API base URL
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Anthropic API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Messages API requires an explicit generation cap
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Anthropic Messages API client
pub struct AnthropicProvider {
    client: Client,
    base_url: Option<Url>,
    api_key: SecretString,
    model: String,
    params: ChatParams,
}

impl AnthropicProvider {
    /// Create from provider configuration
    pub fn new(config: &AnthropicConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            params: config.default_params.clone(),
        }
    }

    /// Build the messages endpoint URL
    fn messages_url(&self) -> String {
        let base = self
            .base_url
            .as_ref()
            .map_or(DEFAULT_BASE_URL, |url| url.as_str())
            .trim_end_matches('/');
        format!("{base}/messages")
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn provider(&self) -> &str {
        "anthropic"
    }

    async fn chat(&self, request: &ChatRequest, context: &RequestContext) -> Result<ChatResponse, ProviderError> {
        // Anthropic takes system turns as a top-level field, not as messages
        let mut system = String::new();
        let mut messages = Vec::with_capacity(request.message_history.len() + 1);

        for message in request.message_history.iter().chain(std::iter::once(&request.message)) {
            if message.role == "system" {
                if !system.is_empty() {
                    system.push('\n');
                }
                system.push_str(&message.content);
            } else {
                messages.push(WireMessage {
                    role: message.role.clone(),
                    content: message.content.clone(),
                });
            }
        }

        let wire_request = WireRequest {
            model: &self.model,
            messages,
            system: (!system.is_empty()).then_some(system),
            max_tokens: self.params.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: self.params.temperature,
            top_p: self.params.top_p,
        };

        let send = self
            .client
            .post(self.messages_url())
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&wire_request)
            .send();

        let response = tokio::select! {
            () = context.cancellation.cancelled() => return Err(ProviderError::Cancelled),
            result = send => result.map_err(|e| ProviderError::Transport(e.to_string()))?,
        };

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let until_reset = parse_retry_after(response.headers());
            tracing::warn!(provider = "anthropic", ?until_reset, "upstream rate limited");
            return Err(ProviderError::RateLimited { until_reset });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(provider = "anthropic", status = %status, "upstream returned error");
            return Err(ProviderError::RequestFailed {
                status: status.as_u16(),
                message: body,
            });
        }

        let wire_response: WireResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Transport(format!("failed to parse response: {e}")))?;

        Ok(wire_response.into())
    }
}

// -- Wire types --

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
}

#[derive(Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct WireResponse {
    id: String,
    #[serde(default)]
    content: Vec<WireContentBlock>,
    usage: WireUsage,
}

#[derive(Deserialize)]
struct WireContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct WireUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

impl From<WireResponse> for ChatResponse {
    fn from(wire: WireResponse) -> Self {
        let text: String = wire
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .map(|block| block.text.as_str())
            .collect();

        Self {
            id: response_id(),
            created: unix_now(),
            provider: "anthropic".to_owned(),
            router_id: String::new(),
            model_id: String::new(),
            model_response: ModelResponse {
                response_id: wire.id,
                message: ChatMessage::assistant(text),
                token_usage: TokenUsage {
                    prompt_tokens: wire.usage.input_tokens,
                    response_tokens: wire.usage.output_tokens,
                    total_tokens: wire.usage.input_tokens + wire.usage.output_tokens,
                },
            },
        }
    }
}
