use tokio_util::sync::CancellationToken;

/// Runtime context for a single chat request
///
/// Carries the cancellation signal from the caller down through the router
/// and into the provider clients. Each request gets its own token; cancelling
/// it stops further routing attempts and aborts the in-flight provider call.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Cancellation signal for this request
    pub cancellation: CancellationToken,
}

impl RequestContext {
    /// Create a context with a fresh, uncancelled token
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancellation: CancellationToken::new(),
        }
    }

    /// Whether the caller has given up on this request
    #[must_use]
    pub fn cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
