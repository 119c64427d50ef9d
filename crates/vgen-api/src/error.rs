//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use vgen_models::ErrorBody;
use vgen_provider::ProviderError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Synthesia API key not configured")]
    ConfigurationMissing,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The provider answered with a non-success status.
    #[error("{message} (provider status {status})")]
    Upstream {
        status: u16,
        message: &'static str,
        details: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Map a provider failure, using `message` as the client-facing error text
    /// when the provider itself rejected the call.
    pub fn from_provider(err: ProviderError, message: &'static str) -> Self {
        match err {
            ProviderError::MissingCredential => ApiError::ConfigurationMissing,
            ProviderError::InvalidRequest(msg) => ApiError::BadRequest(msg),
            ProviderError::Upstream { status, body } => ApiError::Upstream {
                status,
                message,
                details: body,
            },
            other => ApiError::Internal(other.to_string()),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ConfigurationMissing | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            ApiError::ConfigurationMissing => ErrorBody::new("Synthesia API key not configured"),
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => ErrorBody::new(msg),
            ApiError::Upstream {
                message, details, ..
            } => ErrorBody::with_details(message, details),
            // Never expose transport internals to the client
            ApiError::Internal(msg) => {
                error!("Server error: {}", msg);
                ErrorBody::new("Internal server error")
            }
        };

        (status, Json(body)).into_response()
    }
}
