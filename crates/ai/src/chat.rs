//! OpenAI-compatible chat-completions client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AiError, AiResult};
use crate::messages::Message;

/// Timeout for chat completions (vision and text).
const CHAT_TIMEOUT: Duration = Duration::from_secs(60);

/// One chat-completion call, fully specified.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Seam over the chat-completions endpoint.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run the request and return the assistant's text, trimmed.
    async fn complete(&self, request: ChatRequest) -> AiResult<String>;
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// HTTP client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl ChatModel for ChatClient {
    async fn complete(&self, request: ChatRequest) -> AiResult<String> {
        if self.api_key.is_empty() {
            return Err(AiError::MissingApiKey("chat model API key"));
        }

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .timeout(CHAT_TIMEOUT)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AiError::MalformedResponse("chat completion without message content".to_string())
            })?;

        Ok(content.trim().to_string())
    }
}
