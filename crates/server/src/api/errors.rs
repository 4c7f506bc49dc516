//! API error types mapped to HTTP status codes.
//!
//! Each [`ApiError`] variant maps to a specific HTTP status code and produces
//! a JSON response body `{"error": "message"}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use sparsedb_core::{Error, StorageError, ValidationError};

/// Application-level error type that implements `IntoResponse`.
///
/// Each variant maps to an HTTP status code:
/// - `BadRequest` → 400
/// - `NotFound` → 404
/// - `BadGateway` → 502 (the backing index failed)
/// - `Internal` → 500
#[derive(Debug)]
pub enum ApiError {
    /// Invalid request parameters (400).
    BadRequest(String),
    /// Nothing relevant found (404).
    NotFound(String),
    /// Backing index call failed (502).
    BadGateway(String),
    /// Unexpected server error (500).
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = axum::Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        tracing::error!(operation = %e.operation(), error = %e, "Index call failed");
        crate::api::metrics::record_storage_error(&e.operation().to_string());
        ApiError::BadGateway(e.to_string())
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        match e {
            Error::Validation(v) => v.into(),
            Error::Storage(s) => s.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ValidationError::Malformed(e.body_text()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sparsedb_core::error::StorageOp;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ApiError::from(Error::from(ValidationError::EmptyQuery)),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(Error::from(StorageError::status(
                    StorageOp::Query,
                    401,
                    "unauthorized",
                ))),
                StatusCode::BAD_GATEWAY,
            ),
            (ApiError::NotFound("none".into()), StatusCode::NOT_FOUND),
            (ApiError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
