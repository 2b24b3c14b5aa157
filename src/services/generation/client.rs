//! Chat-completion client.
//!
//! [`CompletionClient`] is the seam the generator talks to; [`OpenRouterClient`]
//! is the HTTP implementation for OpenAI-compatible chat-completion endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::AiSettings;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);
const RETRY_MAX_DELAY: Duration = Duration::from_secs(30);

/// Errors from a completion call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    #[error("no API key configured")]
    Unauthenticated,

    #[error("completion endpoint unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("unexpected completion response: {0}")]
    UpstreamProtocolError(String),
}

/// Sends one prompt and returns the text of the first completion.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        credential: Option<&SecretString>,
    ) -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Client for OpenRouter and other OpenAI-compatible endpoints.
pub struct OpenRouterClient {
    http: Client,
    endpoint: String,
    model: String,
    site_url: String,
    site_name: String,
    max_retries: u32,
}

impl OpenRouterClient {
    /// Build a client from provider settings.
    pub fn new(settings: &AiSettings) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(settings.timeout))
            .build()?;

        Ok(Self {
            http,
            endpoint: settings.base_url.clone(),
            model: settings.model.clone(),
            site_url: settings.site_url.clone(),
            site_name: settings.site_name.clone(),
            max_retries: settings.max_retries,
        })
    }

    /// Model identifier sent with every request.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_once(&self, prompt: &str, key: &SecretString) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(key.expose_secret())
            .header("HTTP-Referer", &self.site_url)
            .header("X-Title", &self.site_name)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!("Completion request timed out");
                    CompletionError::UpstreamUnavailable("request timed out".to_string())
                } else if e.is_connect() {
                    error!("Failed to connect to completion endpoint: {}", e);
                    CompletionError::UpstreamUnavailable(format!("connection failed: {}", e))
                } else {
                    error!("Completion request failed: {}", e);
                    CompletionError::UpstreamUnavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = status.as_u16(), "Completion endpoint returned an error");
            debug!("Completion error body: {}", body);
            return Err(CompletionError::UpstreamUnavailable(format!(
                "endpoint returned {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CompletionError::UpstreamUnavailable(e.to_string()))?;

        extract_content(&body)
    }
}

/// Exponential backoff before retry `attempt` (0-based), capped at [`RETRY_MAX_DELAY`].
fn retry_delay(attempt: u32) -> Duration {
    RETRY_BASE_DELAY
        .saturating_mul(2u32.saturating_pow(attempt))
        .min(RETRY_MAX_DELAY)
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(
        &self,
        prompt: &str,
        credential: Option<&SecretString>,
    ) -> Result<String, CompletionError> {
        let key = credential.ok_or(CompletionError::Unauthenticated)?;

        let mut attempt = 0;
        loop {
            match self.send_once(prompt, key).await {
                Err(CompletionError::UpstreamUnavailable(reason)) if attempt < self.max_retries => {
                    let delay = retry_delay(attempt);
                    attempt += 1;
                    info!(
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying completion request: {}",
                        reason
                    );
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }
}

/// Pull `choices[0].message.content` out of a response body.
///
/// Content may be a plain string or a list of typed blocks; text blocks are
/// concatenated in order.
fn extract_content(body: &str) -> Result<String, CompletionError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| CompletionError::UpstreamProtocolError(format!("body is not JSON: {}", e)))?;

    let content = value
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .ok_or_else(|| {
            CompletionError::UpstreamProtocolError(
                "missing choices[0].message.content".to_string(),
            )
        })?;

    match content {
        Value::String(text) => Ok(text.clone()),
        Value::Array(blocks) => Ok(blocks
            .iter()
            .filter(|b| b.get("type").and_then(Value::as_str).unwrap_or("text") == "text")
            .filter_map(|b| b.get("text").and_then(Value::as_str))
            .collect()),
        other => Err(CompletionError::UpstreamProtocolError(format!(
            "content has unsupported type: {}",
            json_type(other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
