/// Error types for Blog Service
///
/// Every failure the pipeline can surface is one of these variants. Errors are
/// converted to JSON HTTP responses for API clients.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for blog-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Failure of the remote text-generation call.
///
/// Each upstream failure mode keeps its own variant so callers and logs can
/// tell a dead network from a revoked token from a changed response shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// Request never produced an HTTP response (DNS, connect, timeout, TLS)
    #[error("network failure: {0}")]
    Network(String),

    /// Endpoint rejected the bearer credential
    #[error("credentials rejected (HTTP {status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// Any other non-success status
    #[error("upstream returned HTTP {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// Response body missing the generated text or not valid JSON
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl GenerationError {
    /// Short label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Network(_) => "network",
            GenerationError::Unauthorized { .. } => "unauthorized",
            GenerationError::UpstreamStatus { .. } => "upstream_status",
            GenerationError::MalformedResponse(_) => "malformed_response",
        }
    }
}

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Empty or missing required field. The message is shown to the user as-is.
    #[error("{0}")]
    InvalidInput(String),

    /// Remote post generation failed
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// Local sentiment model could not produce a classification
    #[error("Sentiment inference unavailable: {0}")]
    InferenceUnavailable(String),

    /// Referenced resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Generation(_) => StatusCode::BAD_GATEWAY,
            AppError::InferenceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", self);
        }

        HttpResponse::build(status).json(serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}
