use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Upstream provider configuration for a model
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// OpenAI-compatible chat completions API
    Openai(OpenAiConfig),
    /// Anthropic Messages API
    Anthropic(AnthropicConfig),
}

/// OpenAI provider settings
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key for authentication
    pub api_key: SecretString,
    /// Base URL override (defaults to the public API)
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Model identifier sent to the provider
    pub model: String,
    /// Default generation parameters
    #[serde(default)]
    pub default_params: ChatParams,
}

/// Anthropic provider settings
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// API key for authentication
    pub api_key: SecretString,
    /// Base URL override (defaults to the public API)
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Model identifier sent to the provider
    pub model: String,
    /// Default generation parameters
    #[serde(default)]
    pub default_params: ChatParams,
}

/// Generation parameters applied when the request does not override them
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatParams {
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold
    #[serde(default)]
    pub top_p: Option<f64>,
    /// Maximum tokens to generate
    #[serde(default)]
    pub max_tokens: Option<u32>,
}
