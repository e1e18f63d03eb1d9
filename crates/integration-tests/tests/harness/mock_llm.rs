//! Mock LLM backend for integration tests
//!
//! Implements a minimal OpenAI-compatible chat completions endpoint with
//! scriptable failure modes.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// Mock LLM backend that returns predictable responses
pub struct MockLlm {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockLlmState>,
}

struct MockLlmState {
    completion_count: AtomicU32,
    /// Requests to fail with 500 before succeeding (0 = never fail)
    fail_count: AtomicU32,
    /// Requests to reject with 429 before succeeding (0 = never)
    rate_limit_count: AtomicU32,
    /// Retry-After value sent with 429 responses, in seconds
    retry_after_secs: u32,
    /// Response token count reported in usage
    response_tokens: u32,
    /// Canned response content
    content: String,
}

impl MockLlm {
    /// Start a mock that always succeeds
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(0, 0, 1, "Hello from mock LLM").await
    }

    /// Start a mock that fails the first `n` requests with 500
    pub async fn start_failing(n: u32) -> anyhow::Result<Self> {
        Self::start_inner(n, 0, 1, "Hello from mock LLM").await
    }

    /// Start a mock that rejects the first `n` requests with 429
    pub async fn start_rate_limited(n: u32, retry_after_secs: u32) -> anyhow::Result<Self> {
        Self::start_inner(0, n, retry_after_secs, "Hello from mock LLM").await
    }

    /// Start a mock with custom response content
    pub async fn start_with_response(content: &str) -> anyhow::Result<Self> {
        Self::start_inner(0, 0, 1, content).await
    }

    async fn start_inner(
        fail_count: u32,
        rate_limit_count: u32,
        retry_after_secs: u32,
        content: &str,
    ) -> anyhow::Result<Self> {
        let state = Arc::new(MockLlmState {
            completion_count: AtomicU32::new(0),
            fail_count: AtomicU32::new(fail_count),
            rate_limit_count: AtomicU32::new(rate_limit_count),
            retry_after_secs,
            response_tokens: 42,
            content: content.to_owned(),
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as a provider
    ///
    /// Includes `/v1` since the OpenAI client appends `/chat/completions`
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of completion requests received
    pub fn completion_count(&self) -> u32 {
        self.state.completion_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockLlm {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// -- Wire types matching the OpenAI format --

#[derive(Serialize)]
struct ChatCompletionResponse {
    id: String,
    object: String,
    created: u64,
    model: String,
    choices: Vec<Choice>,
    usage: Usage,
}

#[derive(Serialize)]
struct Choice {
    index: u32,
    message: Message,
    finish_reason: String,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

async fn handle_chat_completions(State(state): State<Arc<MockLlmState>>) -> Response {
    state.completion_count.fetch_add(1, Ordering::Relaxed);

    // Scripted 429s run before scripted 500s
    let rate_limits_left = state.rate_limit_count.load(Ordering::Relaxed);
    if rate_limits_left > 0 {
        state.rate_limit_count.store(rate_limits_left - 1, Ordering::Relaxed);
        return (
            StatusCode::TOO_MANY_REQUESTS,
            [("retry-after", state.retry_after_secs.to_string())],
            "rate limited",
        )
            .into_response();
    }

    let fails_left = state.fail_count.load(Ordering::Relaxed);
    if fails_left > 0 {
        state.fail_count.store(fails_left - 1, Ordering::Relaxed);
        return (StatusCode::INTERNAL_SERVER_ERROR, "mock failure").into_response();
    }

    let response = ChatCompletionResponse {
        id: "chatcmpl-mock-1".to_owned(),
        object: "chat.completion".to_owned(),
        created: 1_700_000_000,
        model: "mock-model-1".to_owned(),
        choices: vec![Choice {
            index: 0,
            message: Message {
                role: "assistant".to_owned(),
                content: state.content.clone(),
            },
            finish_reason: "stop".to_owned(),
        }],
        usage: Usage {
            prompt_tokens: 8,
            completion_tokens: state.response_tokens,
            total_tokens: 8 + state.response_tokens,
        },
    };

    Json(response).into_response()
}
