//! Uniform JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use glyphgate_common::GatewayError;

/// `GatewayError` rendered as `{"error": "..."}` with its status code
#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::warn!(error = %self.0, "Request failed upstream");
        } else {
            tracing::debug!(error = %self.0, "Rejected request");
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
