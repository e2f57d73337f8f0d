//! API request handlers

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use krathong_core::NewKrathong;
use krathong_service::{KrathongService, ServiceError};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::{
    error::{ApiError, ApiResult},
    responses::{HealthResponse, KrathongListResponse, KrathongResponse},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Submission service
    pub services: Arc<dyn KrathongService>,
}

impl AppState {
    /// Create new application state
    pub fn new(services: Arc<dyn KrathongService>) -> Self {
        Self { services }
    }
}

/// Submit a Krathong
#[utoipa::path(
    post,
    path = "/api/v1/krathong",
    tag = "krathong",
    request_body = NewKrathong,
    responses(
        (status = 201, description = "Krathong created", body = KrathongResponse),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 500, description = "Store or broker failure", body = ErrorResponse)
    )
)]
#[instrument(skip(state, payload))]
pub async fn create_krathong(
    State(state): State<AppState>,
    payload: Result<Json<NewKrathong>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<KrathongResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;

    let krathong = state
        .services
        .create_krathong(request)
        .await
        .map_err(|e| {
            error!("Failed to create krathong: {}", e);
            match e {
                ServiceError::Publish(msg) => {
                    ApiError::internal(format!("Failed to publish message: {}", msg))
                }
                other => ApiError::internal(format!("Failed to create Krathong: {}", other)),
            }
        })?;

    info!(krathong_id = %krathong.krathong_id, "Krathong submitted");

    Ok((StatusCode::CREATED, Json(KrathongResponse::created(krathong))))
}

/// List the latest Krathongs, newest first
#[utoipa::path(
    get,
    path = "/api/v1/krathong",
    tag = "krathong",
    responses(
        (status = 200, description = "Latest submissions", body = KrathongListResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_krathongs(
    State(state): State<AppState>,
) -> ApiResult<Json<KrathongListResponse>> {
    let krathongs = state.services.list_latest().await.map_err(|e| {
        error!("Failed to retrieve krathongs: {}", e);
        ApiError::internal("Failed to retrieve Krathongs - Database query error")
    })?;

    Ok(Json(KrathongListResponse::ok(krathongs)))
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Store reachable", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> HealthResponse {
    match state.services.health_check().await {
        Ok(()) => HealthResponse::healthy(),
        Err(e) => {
            warn!("Health check failed: {}", e);
            HealthResponse::unhealthy(e.to_string())
        }
    }
}
