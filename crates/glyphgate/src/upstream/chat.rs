//! Chat-completion endpoint.

use serde::{Deserialize, Serialize};

use glyphgate_common::constants::RECOGNITION_FAILED_TEXT;
use glyphgate_common::{GatewayError, PromptMode};

use super::{UpstreamClient, transport_error, truncate};

// Fixed conversation identifiers the upstream expects on stateless calls
const SESSION_ID: &str = "1";
const CHAT_ID: &str = "2";
const MESSAGE_ID: &str = "3";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    stream: bool,
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    session_id: &'a str,
    chat_id: &'a str,
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentPart<'a> {
    Text { text: &'a str },
    Image { image: &'a str },
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    /// First choice's content, or the fixed failure text
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| RECOGNITION_FAILED_TEXT.to_string())
    }
}

impl UpstreamClient {
    /// Ask the model to read the image behind `file_id`
    ///
    /// Single user turn: instruction text followed by the image reference.
    pub async fn complete(
        &self,
        file_id: &str,
        token: &str,
        prompt: &PromptMode,
    ) -> Result<String, GatewayError> {
        let request = ChatRequest {
            stream: false,
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: prompt.instruction(),
                    },
                    ContentPart::Image { image: file_id },
                ],
            }],
            session_id: SESSION_ID,
            chat_id: CHAT_ID,
            id: MESSAGE_ID,
        };

        let response = self
            .api
            .post(&self.chat_url)
            .header(reqwest::header::ACCEPT, "*/*")
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Chat completion rejected");
            return Err(GatewayError::UpstreamRejected {
                status: status.as_u16(),
                detail: truncate(&text, 200),
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| GatewayError::MalformedUpstreamResponse(e.to_string()))?;

        Ok(parsed.into_text())
    }
}
