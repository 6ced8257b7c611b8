use crate::api::{ChatRequest, ChatTurn, CompletionConfig, Role};
use crate::error::ProviderError;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl From<&ChatTurn> for Message {
    fn from(turn: &ChatTurn) -> Self {
        Message {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatCompletionRequest {
    pub fn from_request(config: &CompletionConfig, request: &ChatRequest) -> Self {
        ChatCompletionRequest {
            model: config.model.clone(),
            messages: request.turns().iter().map(|t| t.into()).collect(),
            temperature: config.temperature,
            max_tokens: config.max_output_tokens,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChatCompletionChoice {
    pub message: Message,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
}

impl ChatCompletionResponse {
    /// First choice's content, whitespace-trimmed. A response without a
    /// choice carries no reply and counts as malformed.
    pub fn reply_text(&self) -> Result<String, ProviderError> {
        let choice = self.choices.first().ok_or_else(|| {
            ProviderError::MalformedResponse("response has no choices".to_string())
        })?;
        Ok(choice.message.content.trim().to_string())
    }
}
