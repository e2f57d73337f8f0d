//! API response types
//!
//! Every response uses the same envelope: a four-digit `response_code`, a
//! human-readable `response_message` and a `data` payload that is `null` on
//! failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use krathong_core::Krathong;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response codes carried in the envelope
pub mod codes {
    /// Operation succeeded
    pub const SUCCESS: &str = "0000";

    /// Request body could not be bound
    pub const INVALID_REQUEST: &str = "0001";

    /// Store or broker failure
    pub const INTERNAL_ERROR: &str = "0004";
}

/// Envelope carrying a single submission
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct KrathongResponse {
    /// Four-digit response code
    #[schema(example = "0000")]
    pub response_code: String,

    /// Human-readable outcome
    #[schema(example = "Krathong created successfully")]
    pub response_message: String,

    /// The persisted submission
    pub data: Option<Krathong>,
}

impl KrathongResponse {
    /// Successful create
    pub fn created(krathong: Krathong) -> Self {
        Self {
            response_code: codes::SUCCESS.to_string(),
            response_message: "Krathong created successfully".to_string(),
            data: Some(krathong),
        }
    }
}

/// Envelope carrying the latest submissions
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct KrathongListResponse {
    /// Four-digit response code
    #[schema(example = "0000")]
    pub response_code: String,

    /// Human-readable outcome
    #[schema(example = "Krathongs retrieved successfully")]
    pub response_message: String,

    /// Submissions, newest first
    pub data: Option<Vec<Krathong>>,
}

impl KrathongListResponse {
    /// Successful list; an empty store yields `[]`, never `null`
    pub fn ok(krathongs: Vec<Krathong>) -> Self {
        Self {
            response_code: codes::SUCCESS.to_string(),
            response_message: "Krathongs retrieved successfully".to_string(),
            data: Some(krathongs),
        }
    }
}

/// Envelope returned for every failure
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Four-digit response code
    #[schema(example = "0004")]
    pub response_code: String,

    /// Error description
    #[schema(example = "Failed to retrieve Krathongs - Database query error")]
    pub response_message: String,

    /// Always `null`
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: HealthStatus,

    /// Service version
    pub version: String,

    /// Failure detail when unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Store reachable
    Healthy,
    /// Store unreachable
    Unhealthy,
}

impl HealthResponse {
    /// Create a healthy response
    pub fn healthy() -> Self {
        Self {
            status: HealthStatus::Healthy,
            version: env!("CARGO_PKG_VERSION").to_string(),
            message: None,
        }
    }

    /// Create an unhealthy response
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            version: env!("CARGO_PKG_VERSION").to_string(),
            message: Some(message.into()),
        }
    }
}

impl IntoResponse for HealthResponse {
    fn into_response(self) -> Response {
        let status_code = match self.status {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        };

        (status_code, Json(self)).into_response()
    }
}
