//! File-ingestion endpoint.

use reqwest::multipart::{Form, Part};
use serde_json::Value;

use glyphgate_common::{GatewayError, UploadResult};

use super::{ImageBlob, UpstreamClient, transport_error, truncate};

/// Raw upstream answer, passed through verbatim by `/proxy/upload`
#[derive(Debug)]
pub struct RawUpload {
    pub status: u16,
    pub body: Value,
}

impl UpstreamClient {
    /// Upload a blob and return the upstream JSON untouched
    pub async fn upload_raw(&self, blob: ImageBlob, token: &str) -> Result<RawUpload, GatewayError> {
        let file_name = blob.file_name();
        let size = blob.bytes.len();
        let part = Part::bytes(blob.bytes)
            .file_name(file_name)
            .mime_str(&blob.mime)
            .map_err(|_| {
                GatewayError::InvalidImageEncoding(format!("unsupported MIME type '{}'", blob.mime))
            })?;
        let form = Form::new().part("file", part);

        let response = self
            .api
            .post(&self.upload_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(transport_error)?;
        let body: Value = serde_json::from_str(&text).map_err(|e| {
            tracing::warn!(status, body = %truncate(&text, 200), "Unparsable upload response");
            GatewayError::MalformedUpstreamResponse(e.to_string())
        })?;

        tracing::debug!(status, bytes = size, "Uploaded image");

        Ok(RawUpload { status, body })
    }

    /// Upload a blob and extract the file identifier
    pub async fn upload(&self, blob: ImageBlob, token: &str) -> Result<UploadResult, GatewayError> {
        let raw = self.upload_raw(blob, token).await?;

        match raw.body.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => Ok(UploadResult {
                file_id: id.to_string(),
            }),
            _ => {
                tracing::warn!(status = raw.status, "Upload response has no file id");
                Err(GatewayError::UploadFailed)
            }
        }
    }
}
