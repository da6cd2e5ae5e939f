//! Generic OpenAI-compatible Chat Completions adapter. Works against any
//! host exposing the `/v1/chat/completions` shape via `base_url` override.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{classify_status, GenerativeProvider, MAX_OUTPUT_TOKENS, SYSTEM_INSTRUCTION};
use crate::error::ProviderError;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
    url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model_override: Option<String>, base_url: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("campaign-forge/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key,
            model: model_override.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            url: base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[async_trait]
impl GenerativeProvider for OpenAiProvider {
    async fn invoke(&self, prompt: &str) -> Result<String, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::Auth);
        }

        let req = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_INSTRUCTION,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_OUTPUT_TOKENS,
        };

        let resp = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let body: ChatResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ProviderError::Transport("no choices in model response".to_string()))
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
