//! OpenAPI document served at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "pedscribe API",
        version = "0.1.0",
        description = "Editorial review of pediatric clinical case reports.",
    ),
    tags(
        (name = "Health", description = "Liveness, response schema, and redacted config"),
        (name = "Session", description = "Case text, PDF upload, and the analysis lifecycle"),
    ),
    paths(
        crate::api::health::health,
        crate::api::health::schema,
        crate::api::health::config_summary,
        crate::api::session::get_session,
        crate::api::session::put_text,
        crate::api::session::load_example,
        crate::api::session::upload,
        crate::api::session::analyze,
        crate::api::session::retry,
        crate::api::session::reset,
    ),
    components(schemas(
        crate::api::ErrorResponse,
        crate::api::health::HealthResponse,
        crate::api::session::TextRequest,
    ))
)]
pub struct ApiDoc;
