//! Typed failure taxonomy for the generation pipeline, plus the HTTP mapping.
//! Every stage failure maps to exactly one response; diagnostic payloads
//! (raw model text, parsed-but-rejected object) are carried in the body
//! rather than discarded.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

/// Failures from a generative-text provider. Throttling and credential
/// problems stay distinct so the HTTP layer can give them their own codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Credential missing or rejected. Terminal; retrying cannot help.
    #[error("provider rejected the configured API key")]
    Auth,
    /// Provider signalled throttling. Retryable by the caller after backoff.
    #[error("provider rate limit reached")]
    RateLimited,
    /// Network/service failure not otherwise classified.
    #[error("model request failed: {0}")]
    Transport(String),
}

/// Outcome of parsing and checking model output against the campaign shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The normalized text is not valid JSON. Carries the raw text.
    #[error("model returned invalid JSON")]
    MalformedPayload { raw: String },
    /// Parsed fine but a required field is missing or mistyped. Carries the
    /// parsed value.
    #[error("model response does not match the campaign schema: {reason}")]
    SchemaMismatch { payload: Value, reason: String },
}

/// Failure reported by the content store client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("content store request failed: {detail}")]
pub struct StoreError {
    pub detail: String,
}

impl StoreError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// One variant per way a `/generate` request can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    #[error("`topic` string is required")]
    InvalidTopic,
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl GenerateError {
    pub fn status(&self) -> StatusCode {
        match self {
            GenerateError::InvalidTopic => StatusCode::BAD_REQUEST,
            GenerateError::Provider(ProviderError::Auth) => StatusCode::UNAUTHORIZED,
            GenerateError::Provider(ProviderError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
            GenerateError::Provider(ProviderError::Transport(_))
            | GenerateError::Validation(_)
            | GenerateError::Store(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn body(&self) -> Value {
        match self {
            GenerateError::InvalidTopic => json!({ "error": "`topic` string is required" }),
            GenerateError::Provider(ProviderError::Auth) => {
                json!({ "error": "invalid provider API key" })
            }
            GenerateError::Provider(ProviderError::RateLimited) => {
                json!({ "error": "provider rate limit reached — try again shortly" })
            }
            GenerateError::Provider(ProviderError::Transport(detail)) => {
                json!({ "error": "model request failed", "detail": detail })
            }
            GenerateError::Validation(ValidationError::MalformedPayload { raw }) => {
                json!({ "error": "model returned invalid JSON", "raw": raw })
            }
            GenerateError::Validation(ValidationError::SchemaMismatch { payload, reason }) => {
                json!({
                    "error": "model response does not match campaign schema",
                    "reason": reason,
                    "payload": payload,
                })
            }
            GenerateError::Store(e) => {
                json!({ "error": "content store write failed", "detail": e.detail })
            }
        }
    }
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
