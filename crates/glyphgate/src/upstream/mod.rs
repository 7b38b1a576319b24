//! Upstream HTTP client.
//!
//! Three outbound calls, all sequential within a request:
//! - GET of a caller-supplied image URL
//! - multipart upload to the file-ingestion endpoint
//! - chat completion referencing the uploaded file id
//!
//! No retries. Transport failures (including timeouts) become
//! `UpstreamUnreachable`.

mod chat;
mod upload;

use anyhow::{Context, Result};
use std::time::Duration;

use glyphgate_common::GatewayError;
use glyphgate_common::constants::endpoints;

use crate::config::UpstreamConfig;

/// Image bytes ready for multipart upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl ImageBlob {
    /// File name advertised in the multipart part, e.g. `image.png`
    pub fn file_name(&self) -> String {
        let ext = match self.mime.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/bmp" => "bmp",
            "image/tiff" => "tiff",
            "image/svg+xml" => "svg",
            other => other
                .strip_prefix("image/")
                .filter(|s| s.chars().all(|c| c.is_ascii_alphanumeric()))
                .unwrap_or("bin"),
        };
        format!("image.{}", ext)
    }
}

/// Body and advertised content type of a fetched URL
#[derive(Debug)]
pub struct FetchedBody {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Client for the upstream model service
pub struct UpstreamClient {
    /// Upload + completion calls
    api: reqwest::Client,
    /// Remote image downloads (separate timeout)
    fetch: reqwest::Client,
    upload_url: String,
    chat_url: String,
    model: String,
    /// Largest remote image body accepted
    max_fetch_bytes: usize,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig, max_fetch_bytes: usize) -> Result<Self> {
        let api = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .context("Failed to build upstream HTTP client")?;

        let fetch = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .context("Failed to build image fetch client")?;

        Ok(Self {
            api,
            fetch,
            upload_url: config.endpoint(endpoints::FILE_UPLOAD),
            chat_url: config.endpoint(endpoints::CHAT_COMPLETIONS),
            model: config.model.clone(),
            max_fetch_bytes,
        })
    }

    /// GET a caller-supplied image URL
    pub async fn fetch(&self, url: &str) -> Result<FetchedBody, GatewayError> {
        let mut response = self.fetch.get(url).send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Image URL fetch rejected");
            return Err(GatewayError::UpstreamFetchFailed(format!("HTTP {}", status)));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_ascii_lowercase());

        let too_large = || {
            GatewayError::UpstreamFetchFailed(format!(
                "image exceeds {} bytes",
                self.max_fetch_bytes
            ))
        };

        if response
            .content_length()
            .is_some_and(|len| len > self.max_fetch_bytes as u64)
        {
            tracing::warn!(url = %url, "Image URL advertises an oversized body");
            return Err(too_large());
        }

        // Content-Length may be absent or wrong, so the cap holds while streaming too
        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| GatewayError::UpstreamFetchFailed(e.to_string()))?
        {
            if bytes.len() + chunk.len() > self.max_fetch_bytes {
                tracing::warn!(url = %url, "Image URL body exceeds the size cap");
                return Err(too_large());
            }
            bytes.extend_from_slice(&chunk);
        }

        tracing::debug!(url = %url, bytes = bytes.len(), content_type = ?content_type, "Fetched image URL");

        Ok(FetchedBody {
            bytes,
            content_type,
        })
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    tracing::warn!(error = %e, timeout = e.is_timeout(), "Upstream transport failure");
    if e.is_timeout() {
        GatewayError::UpstreamUnreachable(format!("request timed out: {}", e))
    } else {
        GatewayError::UpstreamUnreachable(e.to_string())
    }
}

/// Shorten an upstream body for error messages
fn truncate(body: &str, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}
