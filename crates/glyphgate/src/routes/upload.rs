//! Upload proxy: forward a multipart file to the upstream file store.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::{HeaderMap, StatusCode},
};
use serde_json::Value;

use glyphgate_common::GatewayError;

use super::ApiError;
use super::recognize::resolve_credential;
use crate::pipeline::sniff_mime;
use crate::state::AppState;
use crate::upstream::ImageBlob;

/// `POST /proxy/upload`
///
/// Returns the upstream JSON and status untouched so callers can read the
/// file id themselves and call `/recognize` later.
pub async fn proxy_upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let token = resolve_credential(&headers, None)?;
    let mut multipart =
        multipart.map_err(|e| GatewayError::InvalidRequestBody(e.body_text()))?;

    let blob = read_file_field(&mut multipart).await?;
    tracing::debug!(mime = %blob.mime, bytes = blob.bytes.len(), "Proxying upload");

    let raw = state.upstream.upload_raw(blob, &token).await?;
    let status = StatusCode::from_u16(raw.status).unwrap_or(StatusCode::BAD_GATEWAY);

    Ok((status, Json(raw.body)))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<ImageBlob, GatewayError> {
    let invalid = |e: axum::extract::multipart::MultipartError| {
        GatewayError::InvalidRequestBody(e.body_text())
    };

    while let Some(field) = multipart.next_field().await.map_err(invalid)? {
        if field.name() != Some("file") {
            continue;
        }

        let declared = field
            .content_type()
            .filter(|ct| ct.starts_with("image/"))
            .map(str::to_string);
        let bytes = field.bytes().await.map_err(invalid)?;
        if bytes.is_empty() {
            return Err(GatewayError::MissingPayload("file"));
        }

        let mime = declared
            .or_else(|| sniff_mime(&bytes).map(str::to_string))
            .unwrap_or_else(|| "application/octet-stream".to_string());

        return Ok(ImageBlob {
            bytes: bytes.to_vec(),
            mime,
        });
    }

    Err(GatewayError::MissingPayload("file"))
}
