//! Recognition pipeline.
//!
//! ```text
//! ImageSource ─ normalize ─┬─ Blob ── upload ──┐
//!                          └─ FileId ──────────┴─ complete ─ classify
//! ```
//!
//! Every step awaits the previous one; nothing is shared between requests.

mod classifier;
mod normalizer;

pub use classifier::classify;
pub use normalizer::{NormalizedImage, normalize, sniff_mime};

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use glyphgate_common::{GatewayError, RecognitionRequest, RecognitionResult};

use crate::upstream::UpstreamClient;

/// Standard alphabet, padding optional
pub(crate) const BASE64_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Run one request through normalize → upload → complete → classify.
pub async fn recognize(
    request: RecognitionRequest,
    upstream: &UpstreamClient,
) -> Result<RecognitionResult, GatewayError> {
    let RecognitionRequest {
        source,
        credential,
        prompt,
    } = request;

    let kind = source.kind();
    let file_id = match normalize(source, upstream).await? {
        NormalizedImage::FileId(id) => id,
        NormalizedImage::Blob(blob) => upstream.upload(blob, &credential).await?.file_id,
    };
    tracing::debug!(input = kind, file_id = %file_id, advanced = prompt.is_advanced(), "Invoking recognition");

    let raw = upstream.complete(&file_id, &credential, &prompt).await?;
    let (result_type, text) = classify(&raw, &prompt);

    tracing::debug!(input = kind, result_type = ?result_type, chars = text.chars().count(), "Recognition complete");

    Ok(RecognitionResult::new(result_type, text))
}
