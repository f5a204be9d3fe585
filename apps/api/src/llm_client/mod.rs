/// LLM Client — the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// All LLM interactions MUST go through this module, via the `TextGenerator`
/// trait so the capability can be absent or stubbed.
///
/// Every call is single-shot: one request, one sample, no retries.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
pub const MODEL: &str = "claude-sonnet-4-5";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM call timed out after {0:?}")]
    Timeout(Duration),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A text-generation capability. `LlmClient` is the production backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a single completion bounded by `max_tokens`.
    async fn generate(&self, prompt: &str, system: &str, max_tokens: u32)
        -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Wraps the Anthropic Messages API behind a hard per-call timeout.
///
/// The timeout bounds the whole exchange, from connect to the last body byte.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_key: String,
    timeout: Duration,
}

impl LlmClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_url: ANTHROPIC_API_URL.to_string(),
            api_key,
            timeout,
        })
    }

    /// Makes a raw call to the Messages API, returning the full response object.
    pub async fn call(
        &self,
        prompt: &str,
        system: &str,
        max_tokens: u32,
    ) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        tokio::time::timeout(self.timeout, self.exchange(&request_body))
            .await
            .map_err(|_| LlmError::Timeout(self.timeout))?
    }

    async fn exchange(&self, request_body: &AnthropicRequest<'_>) -> Result<LlmResponse, LlmError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: LlmResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(
        &self,
        prompt: &str,
        system: &str,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let response = self.call(prompt, system, max_tokens).await?;
        response
            .text()
            .map(str::to_string)
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}
