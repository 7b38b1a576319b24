//! Image input normalization.
//!
//! Turns any of the three input representations into either an uploadable
//! blob or a file id that can go straight to the completion call.

use base64::Engine;

use glyphgate_common::constants::DEFAULT_IMAGE_MIME;
use glyphgate_common::{GatewayError, ImageSource};

use super::BASE64_LENIENT;
use crate::upstream::{ImageBlob, UpstreamClient};

/// What the pipeline does next with a normalized input
#[derive(Debug, PartialEq, Eq)]
pub enum NormalizedImage {
    /// Needs uploading first
    Blob(ImageBlob),
    /// Already known upstream
    FileId(String),
}

pub async fn normalize(
    source: ImageSource,
    upstream: &UpstreamClient,
) -> Result<NormalizedImage, GatewayError> {
    match source {
        ImageSource::RemoteUrl(url) => {
            let fetched = upstream.fetch(&url).await?;
            let mime = resolve_mime(fetched.content_type.as_deref(), &fetched.bytes, &url);
            Ok(NormalizedImage::Blob(ImageBlob {
                bytes: fetched.bytes,
                mime,
            }))
        }
        ImageSource::Base64Payload(payload) => decode_base64_image(&payload).map(NormalizedImage::Blob),
        ImageSource::FileId(id) => Ok(NormalizedImage::FileId(id)),
    }
}

/// Decode a Base64 image, with or without a `data:` URI prefix.
///
/// Bare payloads are treated as `image/png`.
pub fn decode_base64_image(payload: &str) -> Result<ImageBlob, GatewayError> {
    let payload = payload.trim();
    let data_uri = if payload.starts_with("data:") {
        payload.to_string()
    } else {
        format!("data:{};base64,{}", DEFAULT_IMAGE_MIME, payload)
    };

    let (header, data) = data_uri
        .split_once(',')
        .ok_or_else(|| GatewayError::InvalidImageEncoding("data URI has no ',' separator".into()))?;

    let meta = &header["data:".len()..];
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| GatewayError::InvalidImageEncoding("data URI is not base64".into()))?;
    let mime = if mime.is_empty() {
        DEFAULT_IMAGE_MIME.to_string()
    } else {
        mime.to_ascii_lowercase()
    };

    // Line-wrapped Base64 is common in pasted data
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = BASE64_LENIENT
        .decode(compact.as_bytes())
        .map_err(|e| GatewayError::InvalidImageEncoding(e.to_string()))?;

    if bytes.is_empty() {
        return Err(GatewayError::InvalidImageEncoding("empty image".into()));
    }

    Ok(ImageBlob { bytes, mime })
}

/// Pick a content type for fetched bytes: advertised, sniffed, then URL extension.
fn resolve_mime(advertised: Option<&str>, bytes: &[u8], url: &str) -> String {
    if let Some(ct) = advertised.filter(|ct| ct.starts_with("image/")) {
        return ct.to_string();
    }

    if let Some(mime) = sniff_mime(bytes) {
        return mime.to_string();
    }

    mime_from_extension(url)
        .unwrap_or("application/octet-stream")
        .to_string()
}

/// Content type from magic bytes, if recognizable as an image
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().map(|f| f.to_mime_type())
}

fn mime_from_extension(url: &str) -> Option<&'static str> {
    let path = reqwest::Url::parse(url).ok()?.path().to_string();
    let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
    image::ImageFormat::from_extension(&ext).map(|f| f.to_mime_type())
}
