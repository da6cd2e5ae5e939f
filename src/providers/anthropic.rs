//! Anthropic Messages API adapter. Requires an `x-api-key` header and an
//! `anthropic-version` header; the draft text arrives as the first
//! `text` content block of the response.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{classify_status, GenerativeProvider, MAX_OUTPUT_TOKENS, SYSTEM_INSTRUCTION};
use crate::error::ProviderError;

/// Cost-effective default; overridable from config.
pub const DEFAULT_MODEL: &str = "claude-haiku-4-5";

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl AnthropicProvider {
    pub fn new(api_key: String, model_override: Option<String>) -> Self {
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
        }
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[async_trait]
impl GenerativeProvider for AnthropicProvider {
    async fn invoke(&self, prompt: &str) -> Result<String, ProviderError> {
        if self.api_key.is_empty() {
            return Err(ProviderError::Auth);
        }

        let req = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_OUTPUT_TOKENS,
            system: SYSTEM_INSTRUCTION,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let resp = self
            .http
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&req)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let body: MessagesResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        body.content
            .into_iter()
            .find(|b| b.kind == "text")
            .map(|b| b.text)
            .ok_or_else(|| ProviderError::Transport("no text block in model response".to_string()))
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}
