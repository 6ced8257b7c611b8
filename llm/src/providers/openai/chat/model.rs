use async_trait::async_trait;

use crate::api::{ChatRequest, CompletionConfig};
use crate::client::Client;
use crate::error::ProviderError;
use crate::CompletionModel;

use super::api::{ChatCompletionRequest, ChatCompletionResponse};

pub struct OpenAIChatModel {
    client: Client,
    base_url: String,
    config: CompletionConfig,
}

impl OpenAIChatModel {
    pub fn new(client: Client, base_url: String, config: CompletionConfig) -> Self {
        Self {
            client,
            base_url,
            config,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionModel for OpenAIChatModel {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, ProviderError> {
        let body = ChatCompletionRequest::from_request(&self.config, request);
        tracing::debug!(
            model = %self.config.model,
            turns = request.turns().len(),
            "requesting completion"
        );
        let response: ChatCompletionResponse =
            self.client.post_json(self.completions_url(), &body).await?;
        response.reply_text()
    }
}
