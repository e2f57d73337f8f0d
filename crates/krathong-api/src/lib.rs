//! Krathong API Layer
//!
//! REST surface of the Krathong service built on Axum: request handlers,
//! the response envelope, error mapping, middleware, the OpenAPI
//! document and its Swagger UI.
//!
//! # Example
//!
//! ```rust,no_run
//! use krathong_api::build_api_server;
//! use krathong_service::KrathongService;
//! use std::sync::Arc;
//!
//! # async fn example(services: Arc<dyn KrathongService>) -> std::io::Result<()> {
//! let app = build_api_server(services);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await
//! # }
//! ```

pub mod docs;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod responses;
pub mod routes;

pub use docs::{swagger_ui, ApiDoc, OPENAPI_JSON_PATH, SWAGGER_UI_PATH};
pub use error::{ApiError, ApiResult};
pub use handlers::AppState;
pub use middleware::{cors_layer, trace_layer, UuidRequestIdGenerator, REQUEST_ID_HEADER};
pub use responses::{
    codes, ErrorResponse, HealthResponse, HealthStatus, KrathongListResponse, KrathongResponse,
};
pub use routes::{build_router, API_V1_PREFIX};

use axum::Router;
use krathong_service::KrathongService;
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};

/// Build the complete API server with middleware
///
/// Layers added later wrap the earlier ones, so the request ID is assigned
/// before tracing and copied onto every response, CORS preflights included.
pub fn build_api_server(services: Arc<dyn KrathongService>) -> Router {
    let state = AppState::new(services);

    build_router(state)
        .layer(cors_layer())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(trace_layer())
        .layer(SetRequestIdLayer::x_request_id(UuidRequestIdGenerator))
}
