//! Completion Client
//!
//! Wraps the Anthropic Messages API behind a small trait seam so the
//! pipeline can be driven by a scripted stub in tests. One request
//! per call, no retry, no backoff.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

/// API version header required by the messages endpoint.
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}

/// A text-completion service: one prompt in, raw text out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, CompletionError>;
}

/// Production client for the Anthropic Messages API.
///
/// No request timeout is configured; a call blocks until the service
/// answers or the connection drops.
pub struct AnthropicClient {
    api_url: String,
    api_key: String,
    model: String,
    http: Client,
}

impl AnthropicClient {
    /// Create a new completion client.
    ///
    /// * `api_url` - Base URL for the API (e.g. `https://api.anthropic.com`).
    /// * `api_key` - Value for the `x-api-key` header.
    /// * `model` - Model identifier used for every request.
    pub fn new(api_url: String, api_key: String, model: String) -> Self {
        Self {
            api_url,
            api_key,
            model,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    /// Send one user message and return the first content block's text.
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, CompletionError> {
        let body = serde_json::json!({
            "model": self.model,
            "max_tokens": max_tokens,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let url = format!("{}/v1/messages", self.api_url);
        let resp = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = resp.json().await?;
        let text = json
            .get("content")
            .and_then(|c| c.get(0))
            .and_then(|block| block.get("text"))
            .and_then(|t| t.as_str())
            .ok_or_else(|| CompletionError::MalformedResponse(json.to_string()))?;

        Ok(text.to_string())
    }
}
