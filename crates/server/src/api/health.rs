//! Health, response schema, and redacted config endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub profile_version: &'static str,
    pub api_key_configured: bool,
}

/// Server liveness and whether an API key is currently visible
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Server is up", body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        profile_version: pedscribe_llm::request::INSTRUCTION_PROFILE_VERSION,
        api_key_configured: state.config.llm.credential().resolve().is_some(),
    })
}

/// JSON schema the AI service is asked to follow
#[utoipa::path(
    get,
    path = "/schema",
    tag = "Health",
    responses((status = 200, description = "Gemini responseSchema", body = Object))
)]
pub async fn schema() -> Json<serde_json::Value> {
    Json(pedscribe_llm::response_schema())
}

/// Redacted configuration (no secrets)
#[utoipa::path(
    get,
    path = "/config",
    tag = "Health",
    responses((status = 200, description = "Config summary", body = Object))
)]
pub async fn config_summary(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(state.config.redacted_summary())
}
