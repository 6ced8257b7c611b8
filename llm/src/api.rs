use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a conversation. Immutable once created; ordering within a
/// history is significant.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A full turn sequence as handed to a provider.
#[derive(Clone, Debug)]
pub struct ChatRequest {
    pub(crate) turns: Vec<ChatTurn>,
}

impl ChatRequest {
    /// Create a request from an iterator of turn references.
    ///
    /// Accepts a slice, a `Vec<&ChatTurn>`, or any other iterator yielding
    /// `&ChatTurn`; turns are cloned once when the request is built.
    pub fn new<'a>(turns: impl IntoIterator<Item = &'a ChatTurn>) -> Self {
        ChatRequest {
            turns: turns.into_iter().cloned().collect(),
        }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }
}

/// Per-model request parameters.
#[derive(Clone, Debug)]
pub struct CompletionConfig {
    pub model: String,
    /// Sampling temperature, valid range [0, 2]
    pub temperature: f32,
    /// Upper bound on reply length, in tokens
    pub max_output_tokens: u32,
}
