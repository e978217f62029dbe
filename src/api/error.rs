//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::pipeline::extraction::ExtractionError;
use crate::pipeline::processor::ProcessingError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),
    #[error("Unprocessable upload: {0}")]
    Unprocessable(String),
    #[error("Upstream service failed: {0}")]
    BadGateway(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail),
            ApiError::PayloadTooLarge(detail) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", detail)
            }
            ApiError::Unprocessable(detail) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "NO_TEXT", detail)
            }
            ApiError::BadGateway(detail) => {
                tracing::warn!(detail, "Upstream OCR failure");
                (StatusCode::BAD_GATEWAY, "OCR_FAILED", detail)
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<ProcessingError> for ApiError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::EmptyInput => ApiError::BadRequest(err.to_string()),
            ProcessingError::NoText => ApiError::Unprocessable(err.to_string()),
            ProcessingError::Extraction(e @ ExtractionError::FileTooLarge { .. }) => {
                ApiError::PayloadTooLarge(e.to_string())
            }
            ProcessingError::Extraction(e) => ApiError::BadGateway(e.to_string()),
        }
    }
}
