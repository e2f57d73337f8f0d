//! OpenAPI document and Swagger UI

use krathong_core::{Krathong, NewKrathong};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{handlers, responses};

/// OpenAPI description of the HTTP surface
#[derive(OpenApi)]
#[openapi(
    info(title = "Krathong Service", description = "Loy Krathong submission API"),
    paths(
        handlers::create_krathong,
        handlers::list_krathongs,
        handlers::health_check,
    ),
    components(schemas(
        Krathong,
        NewKrathong,
        responses::KrathongResponse,
        responses::KrathongListResponse,
        responses::ErrorResponse,
        responses::HealthResponse,
        responses::HealthStatus,
    )),
    tags(
        (name = "krathong", description = "Krathong submissions"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Path of the raw OpenAPI document
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Path of the browsable Swagger UI
pub const SWAGGER_UI_PATH: &str = "/swagger";

/// Swagger UI at [`SWAGGER_UI_PATH`], also serving the document at
/// [`OPENAPI_JSON_PATH`]
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi())
}
