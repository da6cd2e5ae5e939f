//! Generative-text providers behind one provider-neutral trait. All
//! normalization and validation lives downstream, so adapters only turn a
//! prompt into raw text (or a classified failure).

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::error::ProviderError;

pub mod anthropic;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;

/// System instruction shared by every adapter.
pub const SYSTEM_INSTRUCTION: &str =
    "You are a JSON generator. Output ONLY valid JSON — no markdown fences, no explanation, no extra text.";

/// Output budget for one campaign draft.
pub const MAX_OUTPUT_TOKENS: u32 = 2048;

/// One blocking remote call, no internal retry.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<String, ProviderError>;
    /// Provider name for diagnostics/logs.
    fn name(&self) -> &'static str;
}

/// Trait object used by the handlers and tests.
pub type DynProvider = Arc<dyn GenerativeProvider>;

/// Factory: build the provider the config names.
///
/// * If `FORGE_TEST_MODE=mock`, returns a deterministic mock provider.
/// * Else builds the configured adapter ("anthropic" | "openai" | "mock").
pub fn build_provider(config: &AppConfig) -> DynProvider {
    if std::env::var("FORGE_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        return Arc::new(MockProvider::canned());
    }

    match config.provider.as_str() {
        "anthropic" => Arc::new(AnthropicProvider::new(
            config.api_key.clone(),
            config.model.clone(),
        )),
        "openai" => Arc::new(OpenAiProvider::new(
            config.api_key.clone(),
            config.model.clone(),
            config.base_url.clone(),
        )),
        _ => Arc::new(MockProvider::canned()),
    }
}

/// Map a non-2xx provider status onto the failure taxonomy.
pub(crate) fn classify_status(status: reqwest::StatusCode, body: &str) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::Auth,
        429 => ProviderError::RateLimited,
        code => ProviderError::Transport(format!("provider returned HTTP {code}: {body}")),
    }
}

/// Deterministic stand-in for tests and credential-free local runs.
pub struct MockProvider {
    reply: Result<String, ProviderError>,
}

impl MockProvider {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
        }
    }

    pub fn fail(err: ProviderError) -> Self {
        Self { reply: Err(err) }
    }

    /// A fixed, schema-compliant campaign so the service can boot and serve
    /// `/generate` without any provider credential.
    pub fn canned() -> Self {
        Self::ok(
            serde_json::json!({
                "_type": "campaign",
                "title": "Mock Campaign",
                "slug": { "_type": "slug", "current": "mock-campaign" },
                "headline": "A deterministic draft for local development and tests",
                "price": 19.99,
                "content": [{
                    "_type": "block",
                    "style": "normal",
                    "markDefs": [],
                    "children": [{ "_type": "span", "text": "Canned campaign copy.", "marks": [] }]
                }]
            })
            .to_string(),
        )
    }
}

#[async_trait]
impl GenerativeProvider for MockProvider {
    async fn invoke(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.reply.clone()
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_distinguishes_auth_throttle_and_transport() {
        let auth = classify_status(reqwest::StatusCode::UNAUTHORIZED, "");
        assert_eq!(auth, ProviderError::Auth);

        let forbidden = classify_status(reqwest::StatusCode::FORBIDDEN, "");
        assert_eq!(forbidden, ProviderError::Auth);

        let throttled = classify_status(reqwest::StatusCode::TOO_MANY_REQUESTS, "");
        assert_eq!(throttled, ProviderError::RateLimited);

        match classify_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "overloaded") {
            ProviderError::Transport(detail) => {
                assert!(detail.contains("500"));
                assert!(detail.contains("overloaded"));
            }
            other => panic!("expected Transport, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn canned_mock_output_is_valid_campaign_json() {
        let provider = MockProvider::canned();
        let raw = provider.invoke("anything").await.expect("mock reply");
        let draft = crate::validate::validate(&raw).expect("canned output should validate");
        assert_eq!(draft.slug.current, "mock-campaign");
    }
}
