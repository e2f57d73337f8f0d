//! API error handling
//!
//! Converts extractor rejections and service errors into the shared
//! response envelope with the matching HTTP status.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

use crate::responses::{codes, ErrorResponse};

/// API error type that can be converted to HTTP responses
#[derive(Debug)]
pub struct ApiError {
    status_code: StatusCode,
    response_code: &'static str,
    message: String,
}

impl ApiError {
    /// Create a new API error
    pub fn new(
        status_code: StatusCode,
        response_code: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status_code,
            response_code,
            message: message.into(),
        }
    }

    /// Create an invalid request error (400, code `0001`)
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::INVALID_REQUEST, message)
    }

    /// Create an internal server error (500, code `0004`)
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL_ERROR,
            message,
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            response_code: self.response_code.to_string(),
            response_message: self.message,
            data: None,
        };

        (self.status_code, Json(body)).into_response()
    }
}

/// Every body that cannot be bound is a client error, whatever the cause
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_request(format!("Invalid JSON format: {}", rejection.body_text()))
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
