//! Core types shared across Glyphgate components.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PROMPT;

/// The three mutually exclusive ways a caller can hand over an image.
///
/// Selected once by the route that was invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Image fetched by the gateway before upload
    RemoteUrl(String),
    /// Inline Base64, with or without a `data:` URI prefix
    Base64Payload(String),
    /// Already uploaded upstream; skips the upload step
    FileId(String),
}

impl ImageSource {
    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RemoteUrl(_) => "remote_url",
            Self::Base64Payload(_) => "base64",
            Self::FileId(_) => "file_id",
        }
    }
}

/// Which instruction text accompanies the image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PromptMode {
    /// Built-in text/formula/captcha instruction, with post-processing
    #[default]
    Default,
    /// Caller-supplied instruction, raw model output returned untouched
    Advanced { prompt: String },
}

impl PromptMode {
    /// Instruction text sent alongside the image
    pub fn instruction(&self) -> &str {
        match self {
            Self::Default => DEFAULT_PROMPT,
            Self::Advanced { prompt } => prompt,
        }
    }

    pub fn is_advanced(&self) -> bool {
        matches!(self, Self::Advanced { .. })
    }
}

/// One recognition call, owned by the handling request.
#[derive(Debug, Clone)]
pub struct RecognitionRequest {
    pub source: ImageSource,
    /// Bearer token, non-empty by construction in the router
    pub credential: String,
    pub prompt: PromptMode,
}

/// Classification of the model's answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    /// Short alphanumeric verification code, uppercased
    Captcha,
    /// Free-form text or math, delimiter-repaired
    Text,
}

/// Upstream file-ingestion response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(rename = "id")]
    pub file_id: String,
}

/// Result returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub success: bool,

    #[serde(rename = "type")]
    pub result_type: ResultType,

    #[serde(rename = "result")]
    pub result_text: String,

    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl RecognitionResult {
    pub fn new(result_type: ResultType, result_text: String) -> Self {
        Self {
            success: true,
            result_type,
            result_text,
            error_message: None,
        }
    }
}
