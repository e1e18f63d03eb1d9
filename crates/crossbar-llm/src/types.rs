use serde::{Deserialize, Serialize};

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message author ("system", "user", or "assistant")
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_owned(),
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_owned(),
            content: content.into(),
        }
    }
}

/// Provider-agnostic chat request
///
/// Passed through the router and into provider clients verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The message to respond to
    pub message: ChatMessage,
    /// Prior conversation turns, oldest first
    #[serde(default)]
    pub message_history: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Build a request from a single user message
    pub fn from_text(content: impl Into<String>) -> Self {
        Self {
            message: ChatMessage::user(content),
            message_history: Vec::new(),
        }
    }
}

/// Token usage reported by the provider
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: u32,
    /// Tokens generated in the response
    pub response_tokens: u32,
    /// Total tokens billed
    pub total_tokens: u32,
}

/// The provider's answer in unified form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Provider-side response identifier
    pub response_id: String,
    /// Generated message
    pub message: ChatMessage,
    /// Token usage statistics
    pub token_usage: TokenUsage,
}

/// Provider-agnostic chat response
///
/// Provider clients fill everything except `router_id` and `model_id`,
/// which are stamped by the model wrapper and the router so callers learn
/// which candidate answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Gateway-assigned response identifier
    pub id: String,
    /// Unix timestamp of creation
    pub created: u64,
    /// Vendor tag of the provider that answered
    pub provider: String,
    /// Router that served the request
    #[serde(default)]
    pub router_id: String,
    /// Model that produced the response
    #[serde(default)]
    pub model_id: String,
    /// The answer itself
    pub model_response: ModelResponse,
}
