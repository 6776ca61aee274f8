//! Request-facing errors
//!
//! Every variant maps to one HTTP status and renders as `{"error": message}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Result type alias for request handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body could not be decoded into a book
    #[error("{0}")]
    BadRequest(String),

    #[error("Book not found")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(ApiError::NotFound.to_string(), "Book not found");
    }

    #[test]
    fn test_from_serde_error_keeps_message() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let message = err.to_string();
        match ApiError::from(err) {
            ApiError::BadRequest(m) => assert_eq!(m, message),
            other => panic!("Expected BadRequest, got {:?}", other),
        }
    }
}
