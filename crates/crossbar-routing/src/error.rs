use crossbar_core::HttpError;
use crossbar_llm::ProviderError;
use http::StatusCode;
use thiserror::Error;

/// Errors returned by the routing loop
#[derive(Debug, Error)]
pub enum RouterError {
    /// Every candidate model is unhealthy; no provider call was made
    #[error("no healthy models available to serve the request")]
    NoModelsAvailable,

    /// All routing attempts were spent without a successful response
    #[error("all models failed to serve the request")]
    AllModelsUnavailable {
        /// The error from the last attempted model
        #[source]
        last_error: Option<ProviderError>,
    },

    /// The caller gave up before a model answered
    #[error("request cancelled")]
    Cancelled,

    /// No router is registered under the requested id
    #[error("router not found: {router_id}")]
    RouterNotFound {
        /// The id the caller asked for
        router_id: String,
    },
}

impl HttpError for RouterError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NoModelsAvailable | Self::AllModelsUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Cancelled => StatusCode::REQUEST_TIMEOUT,
            Self::RouterNotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::NoModelsAvailable => "no_models_available",
            Self::AllModelsUnavailable { .. } => "all_models_unavailable",
            Self::Cancelled => "request_cancelled",
            Self::RouterNotFound { .. } => "router_not_found",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}
