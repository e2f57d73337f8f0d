//! API route definitions

use axum::{routing::get, Router};

use crate::{
    docs::swagger_ui,
    handlers::{create_krathong, health_check, list_krathongs, AppState},
};

/// Prefix of the versioned API
pub const API_V1_PREFIX: &str = "/api/v1";

/// Build the API router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest(API_V1_PREFIX, build_v1_routes())
        .merge(swagger_ui())
        .with_state(state)
}

/// Build v1 API routes
fn build_v1_routes() -> Router<AppState> {
    Router::new().route("/krathong", get(list_krathongs).post(create_krathong))
}
