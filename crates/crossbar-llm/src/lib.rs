//! Unified chat schema and provider clients for crossbar
//!
//! Defines the provider-agnostic request/response shape, the `Provider`
//! trait every upstream client implements, and the normalized error kinds
//! the routing layer reacts to.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod error;
pub mod provider;
pub mod types;

pub use error::ProviderError;
pub use provider::{Provider, build_provider};
pub use types::{ChatMessage, ChatRequest, ChatResponse, ModelResponse, TokenUsage};
