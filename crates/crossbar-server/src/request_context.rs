use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use crossbar_core::RequestContext;

/// Attach a fresh [`RequestContext`] to every request
///
/// Each request gets its own cancellation token; handlers and provider
/// clients observe it when the caller gives up.
pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(RequestContext::new());
    next.run(request).await
}
