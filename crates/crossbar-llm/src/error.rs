use std::time::Duration;

use thiserror::Error;

/// Cooldown applied when a provider rate-limits us without saying for how long
const DEFAULT_RESET_COOLDOWN: Duration = Duration::from_secs(60);

/// Normalized errors surfaced by provider clients
///
/// Providers fold their vendor-specific failures into these kinds; the
/// routing layer only ever reacts to the kind, never to vendor detail.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider rejected the request with a rate limit
    #[error("rate limited by provider")]
    RateLimited {
        /// How long the provider asked us to back off, if it said
        until_reset: Option<Duration>,
    },

    /// The provider answered with a non-success status
    #[error("provider request failed with status {status}: {message}")]
    RequestFailed {
        /// HTTP status returned by the provider
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// The request never completed at the transport level
    #[error("transport error: {0}")]
    Transport(String),

    /// The caller gave up before the provider answered
    #[error("request cancelled")]
    Cancelled,
}

impl ProviderError {
    /// Cooldown to apply for a rate-limit error
    ///
    /// Falls back to a fixed default when the provider did not include a
    /// reset hint. Returns `None` for every other kind.
    pub fn until_reset(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { until_reset } => Some(until_reset.unwrap_or(DEFAULT_RESET_COOLDOWN)),
            _ => None,
        }
    }
}
