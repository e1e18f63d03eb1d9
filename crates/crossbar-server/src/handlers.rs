//! Route handlers for the unified chat API

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json, Router, routing};
use crossbar_core::{HttpError, RequestContext};
use crossbar_llm::ChatRequest;
use crossbar_routing::{RouterError, RouterManager};
use crossbar_telemetry::{Counter, Histogram, KeyValue, metrics};
use serde::Serialize;

/// Shared state for language route handlers
#[derive(Clone)]
pub struct LanguageState {
    manager: Arc<RouterManager>,
    requests: Counter<u64>,
    duration: Histogram<f64>,
}

/// Build the language API router
pub fn language_router(manager: Arc<RouterManager>) -> Router {
    let meter = crossbar_telemetry::meter();

    let state = LanguageState {
        manager,
        requests: meter.u64_counter(metrics::ROUTER_REQUEST_COUNT).build(),
        duration: meter.f64_histogram(metrics::ROUTER_REQUEST_DURATION).build(),
    };

    Router::new()
        .route("/v1/language", routing::get(list_routers))
        .route("/v1/language/{router}/chat", routing::post(language_chat))
        .with_state(state)
}

/// Handle `POST /v1/language/{router}/chat`
async fn language_chat(
    State(state): State<LanguageState>,
    Path(router_id): Path<String>,
    Extension(context): Extension<RequestContext>,
    Json(request): Json<ChatRequest>,
) -> Response {
    let started_at = Instant::now();

    let Some(router) = state.manager.language(&router_id) else {
        return error_response(&RouterError::RouterNotFound { router_id });
    };

    let result = router.chat(&request, &context).await;

    let outcome = if result.is_ok() { "ok" } else { "error" };
    let attributes = [
        KeyValue::new("router", router_id),
        KeyValue::new("outcome", outcome),
    ];
    state.requests.add(1, &attributes);
    metrics::record_duration(&state.duration, started_at, &attributes);

    match result {
        Ok(response) => Json(response).into_response(),
        Err(error) => error_response(&error),
    }
}

/// Handle `GET /v1/language`
async fn list_routers(State(state): State<LanguageState>) -> Response {
    let routers: Vec<RouterSummary> = state
        .manager
        .language_routers()
        .map(|router| RouterSummary {
            id: router.id().to_owned(),
            strategy: router.strategy_name(),
            models: router
                .models()
                .iter()
                .map(|model| ModelSummary {
                    id: model.id().to_owned(),
                    provider: model.provider().to_owned(),
                    healthy: model.healthy(),
                })
                .collect(),
        })
        .collect();

    Json(routers).into_response()
}

/// One router in the `GET /v1/language` listing
#[derive(Serialize)]
struct RouterSummary {
    id: String,
    strategy: &'static str,
    models: Vec<ModelSummary>,
}

/// One model inside a router listing
#[derive(Serialize)]
struct ModelSummary {
    id: String,
    provider: String,
    healthy: bool,
}

/// Convert a router error to a JSON error response
fn error_response(error: &RouterError) -> Response {
    let status = error.status_code();
    let body = serde_json::json!({
        "error": {
            "type": error.error_type(),
            "message": error.client_message(),
        }
    });

    (status, Json(body)).into_response()
}
