use crate::CompletionConfig;
use crate::client::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};

use super::chat::OpenAIChatModel;

#[derive(Clone)]
pub struct OpenAIProvider {
    client: Client,
    base_url: String,
}

impl OpenAIProvider {
    pub fn default(api_key: &str) -> Self {
        Self::new("https://api.openai.com/v1", api_key)
    }

    pub fn new(base_url: &str, api_key: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .expect("Invalid API key format"),
        );

        OpenAIProvider {
            client: Client::with_headers(headers),
            base_url: base_url.to_string(),
        }
    }

    pub fn create_chat_model(&self, config: CompletionConfig) -> OpenAIChatModel {
        OpenAIChatModel::new(self.client.clone(), self.base_url.clone(), config)
    }
}
