//! OpenAI chat completions provider client

use async_trait::async_trait;
use crossbar_config::{ChatParams, OpenAiConfig};
use crossbar_core::RequestContext;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use super::{Provider, parse_retry_after, response_id};
use crate::error::ProviderError;
use crate::types::{ChatMessage, ChatRequest, ChatResponse, ModelResponse, TokenUsage};

/// Default OpenAI API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI chat completions client
pub struct OpenAiProvider {
    client: Client,
    base_url: Option<Url>,
    api_key: SecretString,
    model: String,
    params: ChatParams,
}

impl OpenAiProvider {
    /// Create from provider configuration
    pub fn new(config: &OpenAiConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            params: config.default_params.clone(),
        }
    }

    /// Build the chat completions endpoint URL
    fn chat_url(&self) -> String {
        let base = self
            .base_url
            .as_ref()
            .map_or(DEFAULT_BASE_URL, |url| url.as_str())
            .trim_end_matches('/');
        format!("{base}/chat/completions")
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn provider(&self) -> &str {
        "openai"
    }

    async fn chat(&self, request: &ChatRequest, context: &RequestContext) -> Result<ChatResponse, ProviderError> {
        let mut messages: Vec<WireMessage> = request.message_history.iter().map(WireMessage::from).collect();
        messages.push(WireMessage::from(&request.message));

        let wire_request = WireRequest {
            model: &self.model,
            messages,
            temperature: self.params.temperature,
            top_p: self.params.top_p,
            max_tokens: self.params.max_tokens,
        };

        let send = self
            .client
            .post(self.chat_url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&wire_request)
            .send();

        let response = tokio::select! {
            () = context.cancellation.cancelled() => return Err(ProviderError::Cancelled),
            result = send => result.map_err(|e| ProviderError::Transport(e.to_string()))?,
        };

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let until_reset = parse_retry_after(response.headers());
            tracing::warn!(provider = "openai", ?until_reset, "upstream rate limited");
            return Err(ProviderError::RateLimited { until_reset });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(provider = "openai", status = %status, "upstream returned error");
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
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for WireMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role.clone(),
            content: message.content.clone(),
        }
    }
}

#[derive(Deserialize)]
struct WireResponse {
    id: String,
    created: u64,
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: WireUsage,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Default, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

impl From<WireResponse> for ChatResponse {
    fn from(wire: WireResponse) -> Self {
        let message = wire.choices.into_iter().next().map_or_else(
            || ChatMessage::assistant(""),
            |choice| ChatMessage {
                role: choice.message.role,
                content: choice.message.content,
            },
        );

        Self {
            id: response_id(),
            created: wire.created,
            provider: "openai".to_owned(),
            router_id: String::new(),
            model_id: String::new(),
            model_response: ModelResponse {
                response_id: wire.id,
                message,
                token_usage: TokenUsage {
                    prompt_tokens: wire.usage.prompt_tokens,
                    response_tokens: wire.usage.completion_tokens,
                    total_tokens: wire.usage.total_tokens,
                },
            },
        }
    }
}
