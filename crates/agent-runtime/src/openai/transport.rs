//! Network transport for the Chat Completions endpoint.

use async_trait::async_trait;

use agent_core::error::{AgentError, Result};

use super::OpenAiConfig;
use super::types::{ChatRequest, ChatResponse};

/// Performs one chat-completion call.
///
/// Kept behind a trait so the adapter can be driven without a network.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse>;
}

/// Authenticated HTTP transport built on `reqwest`
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl HttpTransport {
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AgentError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.completions_url(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AgentError::Transport("request timed out".into())
                } else {
                    AgentError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AgentError::Transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            tracing::debug!(%status, body = %body, "Provider returned an error");
            return Err(match status.as_u16() {
                401 | 403 => AgentError::Transport(format!("authentication failed ({status})")),
                _ => AgentError::Transport(format!("HTTP {status}: {}", error_message(&body))),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| AgentError::Transport(format!("malformed provider response: {e}")))
    }
}

/// Pull `error.message` out of an error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
