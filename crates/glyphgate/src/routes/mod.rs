//! HTTP route handlers for Glyphgate.

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{
        HeaderName, Method, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    response::IntoResponse,
    routing::post,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use glyphgate_common::constants::headers::{X_ADVANCED_MODE, X_CUSTOM_COOKIE, X_CUSTOM_PROMPT};

use crate::state::AppState;

mod error;
mod recognize;
mod upload;

pub use error::ApiError;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        // Recognition
        .route("/api/recognize/url", post(recognize::recognize_url))
        .route("/api/recognize/base64", post(recognize::recognize_base64))
        .route("/recognize", post(recognize::recognize_file))

        // Upload once, recognize later
        .route("/proxy/upload", post(upload::proxy_upload))

        // Everything else is 404, including wrong methods on known paths
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)

        .layer(DefaultBodyLimit::max(body_limit))
        // Answers every OPTIONS itself and stamps the origin header on all responses
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static(X_CUSTOM_COOKIE),
            HeaderName::from_static(X_ADVANCED_MODE),
            HeaderName::from_static(X_CUSTOM_PROMPT),
        ])
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}
