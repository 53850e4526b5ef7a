//! API error types and JSON error response formatting.
//!
//! Every failure is reported as `{"success": false, "error": "<message>"}`
//! with a status code matching the kind of failure.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use inkspot_core::InkspotError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

/// Backend and HTTP errors, each mapped to a status code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// 400 Bad Request - malformed body or query.
    #[error("{0}")]
    BadRequest(String),
    /// 401 Unauthorized - bad credentials.
    #[error("{0}")]
    Unauthorized(String),
    /// 409 Conflict - e.g. the email is already registered.
    #[error("{0}")]
    Conflict(String),
    /// 422 Unprocessable Entity - well-formed input that fails validation.
    #[error("{0}")]
    UnprocessableEntity(String),
    /// 500 Internal Server Error.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }

        let body = ErrorBody {
            success: false,
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<InkspotError> for ApiError {
    fn from(err: InkspotError) -> Self {
        match err {
            InkspotError::Validation(msg) => ApiError::UnprocessableEntity(msg),
            InkspotError::Config(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
