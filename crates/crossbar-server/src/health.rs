use axum::Json;
use axum::response::{IntoResponse, Response};

/// Liveness probe
pub async fn health_handler() -> Response {
    Json(serde_json::json!({ "healthy": true })).into_response()
}
