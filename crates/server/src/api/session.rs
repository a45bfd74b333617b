//! Session endpoints: text input, PDF upload, analyze/retry/reset.
//!
//! Every handler returns the full `SessionView` so the client never has to
//! reconstruct state from deltas.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use pedscribe_session::SessionView;
use serde::Deserialize;
use tracing::info;

use super::{api_error, session_error, ApiError};
use crate::state::AppState;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct TextRequest {
    pub text: String,
}

/// Current session state
#[utoipa::path(
    get,
    path = "/session",
    tag = "Session",
    responses((status = 200, description = "Session snapshot", body = Object))
)]
pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    Json(state.session.snapshot().await)
}

/// Replace the case text
#[utoipa::path(
    put,
    path = "/session/text",
    tag = "Session",
    request_body = TextRequest,
    responses(
        (status = 200, description = "Text stored", body = Object),
        (status = 409, description = "Analysis or extraction in progress", body = super::ErrorResponse)
    )
)]
pub async fn put_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Result<Json<SessionView>, ApiError> {
    state
        .session
        .set_text(req.text)
        .await
        .map(Json)
        .map_err(session_error)
}

/// Load the built-in sample case into an empty session
#[utoipa::path(
    post,
    path = "/session/example",
    tag = "Session",
    responses(
        (status = 200, description = "Example loaded", body = Object),
        (status = 409, description = "Session is not empty", body = super::ErrorResponse)
    )
)]
pub async fn load_example(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionView>, ApiError> {
    state.session.load_example().await.map(Json).map_err(session_error)
}

/// Upload a PDF manuscript
///
/// Accepts multipart/form-data with a single file field. Only
/// `application/pdf` is accepted; the extracted text replaces the case text.
#[utoipa::path(
    post,
    path = "/session/upload",
    tag = "Session",
    request_body(content_type = "multipart/form-data", description = "PDF upload"),
    responses(
        (status = 200, description = "Extraction finished (check `notice` for failures)", body = Object),
        (status = 400, description = "Malformed multipart body", body = super::ErrorResponse),
        (status = 409, description = "Busy", body = super::ErrorResponse),
        (status = 415, description = "Not a PDF", body = super::ErrorResponse)
    )
)]
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<SessionView>, ApiError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("Multipart error: {e}")))?
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "No file provided"))?;

    let filename = field.file_name().unwrap_or("unnamed").to_string();
    let mime = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("Failed to read file: {e}")))?;

    info!(file = %filename, mime = %mime, size = bytes.len(), "upload received");

    state
        .session
        .upload(bytes.to_vec(), &mime)
        .await
        .map(Json)
        .map_err(session_error)
}

/// Start an analysis of the current text
///
/// Returns immediately with the session in `LOADING`; poll `GET /session`
/// for the outcome.
#[utoipa::path(
    post,
    path = "/session/analyze",
    tag = "Session",
    responses(
        (status = 202, description = "Analysis started", body = Object),
        (status = 409, description = "Busy", body = super::ErrorResponse),
        (status = 422, description = "No text", body = super::ErrorResponse)
    )
)]
pub async fn analyze(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let view = state.session.spawn_analyze().await.map_err(session_error)?;
    Ok((StatusCode::ACCEPTED, Json(view)))
}

/// Re-issue the failed analysis with the same text
#[utoipa::path(
    post,
    path = "/session/retry",
    tag = "Session",
    responses(
        (status = 202, description = "Retry started", body = Object),
        (status = 409, description = "Nothing to retry", body = super::ErrorResponse)
    )
)]
pub async fn retry(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let view = state.session.spawn_retry().await.map_err(session_error)?;
    Ok((StatusCode::ACCEPTED, Json(view)))
}

/// Clear text, result, and messages
#[utoipa::path(
    post,
    path = "/session/reset",
    tag = "Session",
    responses((status = 200, description = "Session reset", body = Object))
)]
pub async fn reset(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    Json(state.session.reset().await)
}
