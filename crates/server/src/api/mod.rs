pub mod doc;
pub mod health;
pub mod session;

use axum::http::StatusCode;
use axum::Json;
use pedscribe_session::SessionError;
use serde::Serialize;

pub use health::{config_summary, health, schema};
pub use session::{analyze, get_session, load_example, put_text, reset, retry, upload};

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Map a refused transition to an HTTP status.
pub(crate) fn session_error(e: SessionError) -> ApiError {
    let status = match &e {
        SessionError::AnalysisInFlight
        | SessionError::ExtractionInFlight
        | SessionError::NothingToRetry
        | SessionError::ExampleUnavailable => StatusCode::CONFLICT,
        SessionError::EmptyText => StatusCode::UNPROCESSABLE_ENTITY,
        SessionError::InvalidFileType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
    };
    api_error(status, e.to_string())
}
