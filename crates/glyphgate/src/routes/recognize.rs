//! Recognition endpoints.
//!
//! Each route fixes the input kind; credential and prompt mode come from
//! headers (body `token` is still accepted).

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use base64::Engine;
use serde::Deserialize;

use glyphgate_common::constants::headers::{X_ADVANCED_MODE, X_CUSTOM_COOKIE, X_CUSTOM_PROMPT};
use glyphgate_common::{GatewayError, ImageSource, PromptMode, RecognitionRequest, RecognitionResult};

use super::ApiError;
use crate::credential::{extract_token, token_expiry};
use crate::pipeline::{self, BASE64_LENIENT};
use crate::state::AppState;

/// Union of the per-route JSON bodies
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizeBody {
    token: Option<String>,
    image_url: Option<String>,
    base64_image: Option<String>,
    image_id: Option<String>,
}

/// `POST /api/recognize/url`
pub async fn recognize_url(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<RecognitionResult>, ApiError> {
    let body = parse_body(&body)?;
    let source = ImageSource::RemoteUrl(required(body.image_url.as_deref(), "imageUrl")?);
    run(&state, &headers, body.token.as_deref(), source).await
}

/// `POST /api/recognize/base64`
pub async fn recognize_base64(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<RecognitionResult>, ApiError> {
    let body = parse_body(&body)?;
    let source = ImageSource::Base64Payload(required(body.base64_image.as_deref(), "base64Image")?);
    run(&state, &headers, body.token.as_deref(), source).await
}

/// `POST /recognize`
pub async fn recognize_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<RecognitionResult>, ApiError> {
    let body = parse_body(&body)?;
    let source = ImageSource::FileId(required(body.image_id.as_deref(), "imageId")?);
    run(&state, &headers, body.token.as_deref(), source).await
}

async fn run(
    state: &AppState,
    headers: &HeaderMap,
    body_token: Option<&str>,
    source: ImageSource,
) -> Result<Json<RecognitionResult>, ApiError> {
    let request = RecognitionRequest {
        credential: resolve_credential(headers, body_token)?,
        prompt: prompt_mode(headers)?,
        source,
    };

    tracing::debug!(
        input = request.source.kind(),
        model = %state.config.upstream.model,
        advanced = request.prompt.is_advanced(),
        "Recognition requested"
    );

    let result = pipeline::recognize(request, &state.upstream).await?;
    Ok(Json(result))
}

fn parse_body(body: &[u8]) -> Result<RecognizeBody, GatewayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RecognizeBody::default());
    }
    serde_json::from_slice(body).map_err(|e| GatewayError::InvalidRequestBody(e.to_string()))
}

fn required(value: Option<&str>, field: &'static str) -> Result<String, GatewayError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(GatewayError::MissingPayload(field))
}

/// Bearer token from `x-custom-cookie`, else from the body `token` field.
pub fn resolve_credential(
    headers: &HeaderMap,
    body_token: Option<&str>,
) -> Result<String, GatewayError> {
    let from_cookie = headers
        .get(X_CUSTOM_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookie| extract_token(cookie).ok());

    let token = from_cookie
        .or_else(|| {
            body_token
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
        })
        .ok_or(GatewayError::MissingCredential)?;

    match token_expiry(&token) {
        Some(expiry) if expiry < chrono::Utc::now() => {
            tracing::warn!(expired_at = %expiry, "Token looks expired, forwarding anyway");
        }
        Some(expiry) => tracing::debug!(expires_at = %expiry, "Token expiry"),
        None => {}
    }

    Ok(token)
}

/// `x-advanced-mode: true` plus a Base64(URL-encoded) `x-custom-prompt`.
pub fn prompt_mode(headers: &HeaderMap) -> Result<PromptMode, GatewayError> {
    let advanced = headers
        .get(X_ADVANCED_MODE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));

    if !advanced {
        return Ok(PromptMode::Default);
    }

    let encoded = headers
        .get(X_CUSTOM_PROMPT)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(GatewayError::MissingPayload(X_CUSTOM_PROMPT))?;

    let prompt = decode_custom_prompt(encoded)?;
    if prompt.trim().is_empty() {
        return Err(GatewayError::MissingPayload(X_CUSTOM_PROMPT));
    }

    Ok(PromptMode::Advanced { prompt })
}

fn decode_custom_prompt(encoded: &str) -> Result<String, GatewayError> {
    let invalid = |reason: String| GatewayError::InvalidPromptEncoding(reason);

    let bytes = BASE64_LENIENT
        .decode(encoded)
        .map_err(|e| invalid(e.to_string()))?;
    let url_encoded = String::from_utf8(bytes).map_err(|e| invalid(e.to_string()))?;
    let text = urlencoding::decode(&url_encoded).map_err(|e| invalid(e.to_string()))?;

    Ok(text.into_owned())
}
