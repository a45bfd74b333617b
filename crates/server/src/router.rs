//! HTTP router construction.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::api;
use crate::state::AppState;

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let max_upload = state.config.server.max_upload_mb as usize * 1024 * 1024;
    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/health", get(api::health))
        .route("/schema", get(api::schema))
        .route("/config", get(api::config_summary))
        .route("/session", get(api::get_session))
        .route("/session/text", put(api::put_text))
        .route("/session/example", post(api::load_example))
        .route(
            "/session/upload",
            post(api::upload).layer(DefaultBodyLimit::max(max_upload)),
        )
        .route("/session/analyze", post(api::analyze))
        .route("/session/retry", post(api::retry))
        .route("/session/reset", post(api::reset))
        .layer(cors)
        .with_state(state)
        .merge(Scalar::with_url("/docs", api::doc::ApiDoc::openapi()))
}

fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }
    match origin.parse::<axum::http::HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => {
            tracing::warn!(origin, "invalid CORS_ORIGIN, falling back to permissive");
            CorsLayer::permissive()
        }
    }
}
