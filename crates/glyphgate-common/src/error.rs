//! Error taxonomy for the recognition pipeline.

use thiserror::Error;

/// Errors surfaced to gateway callers.
///
/// Client-input classes map to `400`, upstream classes to `500`.
/// Nothing is retried; the caller resubmits.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No `token=<value>` segment in the cookie string and no body token
    #[error("Missing token")]
    MissingCredential,

    /// Required input field absent or empty (`imageUrl`, `base64Image`, `imageId`, ...)
    #[error("Missing {0}")]
    MissingPayload(&'static str),

    /// Base64 image payload could not be decoded
    #[error("Invalid image encoding: {0}")]
    InvalidImageEncoding(String),

    /// `x-custom-prompt` is not Base64 of URL-encoded UTF-8
    #[error("Invalid custom prompt encoding: {0}")]
    InvalidPromptEncoding(String),

    /// Inbound request body is not the expected JSON/multipart shape
    #[error("Invalid request body: {0}")]
    InvalidRequestBody(String),

    /// Remote image URL answered but did not yield an image body
    #[error("Failed to fetch image: {0}")]
    UpstreamFetchFailed(String),

    /// Transport-level failure (connect, TLS, timeout) talking to upstream
    #[error("Upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    /// Upload endpoint responded without a file identifier
    #[error("File upload failed")]
    UploadFailed,

    /// Chat-completion endpoint answered with a non-success status
    #[error("Upstream rejected request ({status}): {detail}")]
    UpstreamRejected { status: u16, detail: String },

    /// Upstream body was not parsable JSON
    #[error("Malformed upstream response: {0}")]
    MalformedUpstreamResponse(String),
}

impl GatewayError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() { 400 } else { 500 }
    }

    /// Returns true if the caller's input caused this error
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential
                | Self::MissingPayload(_)
                | Self::InvalidImageEncoding(_)
                | Self::InvalidPromptEncoding(_)
                | Self::InvalidRequestBody(_)
        )
    }
}
