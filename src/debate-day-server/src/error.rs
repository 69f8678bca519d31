//! HTTP mapping for coordination errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use debate_day_core::DebateError;

/// Wrapper giving [`DebateError`] an HTTP representation.
///
/// Bodies are always `{ "kind": <machine readable>, "error": <message> }`
/// so polling clients can branch on the kind without parsing prose.
pub struct ApiError(pub DebateError);

impl From<DebateError> for ApiError {
    fn from(err: DebateError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DebateError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            DebateError::NotFound(_) => StatusCode::NOT_FOUND,
            DebateError::Conflict(_) => StatusCode::CONFLICT,
            DebateError::TurnViolation { .. } | DebateError::DebateFinished(_) => {
                StatusCode::BAD_REQUEST
            }
            DebateError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "internal fault");
        }
        let body = json!({ "kind": self.0.kind(), "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}
