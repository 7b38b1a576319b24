//! Shared constants for Glyphgate components.

/// Default HTTP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8787";

/// Default upstream base URL (file ingestion + chat completion)
pub const DEFAULT_UPSTREAM_URL: &str = "https://chat.qwenlm.ai";

/// Default multimodal model identifier
pub const DEFAULT_MODEL: &str = "qwen-vl-max-latest";

/// Default outbound timeout for upstream API calls (seconds)
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

/// Default timeout for fetching a caller-supplied image URL (seconds)
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Text substituted when the model returns no content
pub const RECOGNITION_FAILED_TEXT: &str = "识别失败";

/// Captcha answers are at most this many characters
pub const CAPTCHA_MAX_LEN: usize = 10;

/// MIME type assumed for Base64 payloads without a data-URI prefix
pub const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Upstream endpoint paths, relative to the configured base URL
pub mod endpoints {
    /// Multipart file ingestion, returns `{"id": ...}`
    pub const FILE_UPLOAD: &str = "/api/v1/files/";

    /// Chat completion, returns `{"choices": [{"message": {"content": ...}}]}`
    pub const CHAT_COMPLETIONS: &str = "/api/chat/completions";
}

/// HTTP header names
pub mod headers {
    /// Cookie-like string carrying `token=<value>`
    pub const X_CUSTOM_COOKIE: &str = "x-custom-cookie";

    /// `"true"` selects the caller-supplied prompt
    pub const X_ADVANCED_MODE: &str = "x-advanced-mode";

    /// Base64 of the URL-encoded UTF-8 custom prompt
    pub const X_CUSTOM_PROMPT: &str = "x-custom-prompt";
}

/// Built-in instruction covering general text/formula recognition and captchas.
pub const DEFAULT_PROMPT: &str = concat!(
    "请识别图片中的内容，注意以下要求：\n",
    "对于数学公式和普通文本：\n",
    "1. 所有数学公式和数学符号都必须使用标准的LaTeX格式\n",
    "2. 行内公式使用单个$符号包裹，如：$x^2$\n",
    "3. 独立公式块使用两个$$符号包裹，如：$$\\sum_{i=1}^n i^2$$\n",
    "4. 普通文本保持原样，不要使用LaTeX格式\n",
    "5. 保持原文的段落格式和换行\n",
    "6. 明显的换行使用\\n表示\n",
    "7. 确保所有数学符号都被正确包裹在$或$$中\n\n",
    "对于验证码图片：\n",
    "1. 只输出验证码字符，不要加任何额外解释\n",
    "2. 忽略干扰线和噪点\n",
    "3. 注意区分相似字符，如0和O、1和l、2和Z等\n",
    "4. 验证码通常为4-6位字母数字组合\n\n",
    "不要输出任何额外的解释或说明",
);
