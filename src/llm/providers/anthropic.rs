//! Anthropic messages-API backend
//!
//! Alternative provider for the model fallback, selected with
//! `llm.provider = "anthropic"`. The wire format differs from OpenAI in two
//! ways this module has to absorb: the system prompt travels as a top-level
//! field rather than a message, and `max_tokens` is mandatory.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm::provider::{
    CompletionRequest, CompletionResponse, FinishReason, LlmError, LlmProvider, Message,
    MessageRole, TokenUsage,
};

/// Issued when the pipeline leaves `max_tokens` unset
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Connection settings for the Anthropic API
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    /// Value of the `anthropic-version` header
    pub version: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.anthropic.com/v1".to_string(),
            timeout: Duration::from_secs(60),
            version: "2023-06-01".to_string(),
        }
    }
}

pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() {
            return Err(LlmError::NotConfigured(
                "Anthropic API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Pull the system prompt out of the turn list
    fn split_system(messages: &[Message]) -> (Option<String>, Vec<WireMessage>) {
        let mut system = None;
        let mut turns = Vec::with_capacity(messages.len());

        for message in messages {
            match message.role {
                MessageRole::System => system = Some(message.content.clone()),
                MessageRole::User => turns.push(WireMessage {
                    role: "user".to_string(),
                    content: message.content.clone(),
                }),
                MessageRole::Assistant => turns.push(WireMessage {
                    role: "assistant".to_string(),
                    content: message.content.clone(),
                }),
            }
        }

        (system, turns)
    }

    async fn post_messages(&self, body: &WireRequest) -> Result<WireResponse, LlmError> {
        let response = self
            .client
            .post(format!("{}/messages", self.config.base_url))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", &self.config.version)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError(format!(
                "Anthropic API error: {status} - {detail}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))
    }
}

fn map_stop_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("end_turn") | Some("stop_sequence") => FinishReason::Stop,
        Some("max_tokens") => FinishReason::Length,
        _ => FinishReason::Error,
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let (system, messages) = Self::split_system(&request.messages);

        let body = WireRequest {
            model: request.model,
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            messages,
            system,
            temperature: request.temperature,
            top_p: request.top_p,
            stop_sequences: request.stop_sequences,
        };

        debug!(model = %body.model, turns = body.messages.len(), "Sending completion to Anthropic");
        let wire = self.post_messages(&body).await?;

        if wire.content.is_empty() {
            return Err(LlmError::ApiError(
                "No content returned from Anthropic".to_string(),
            ));
        }

        // Responses can carry several blocks; only the text ones matter here
        let text: String = wire
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .map(|block| block.text)
            .collect();

        Ok(CompletionResponse {
            content: Some(text),
            model: wire.model,
            usage: TokenUsage {
                prompt_tokens: wire.usage.input_tokens,
                completion_tokens: wire.usage.output_tokens,
                total_tokens: wire.usage.input_tokens + wire.usage.output_tokens,
            },
            finish_reason: map_stop_reason(wire.stop_reason.as_deref()),
        })
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        // No dedicated probe endpoint; a one-token message stands in
        let probe = WireRequest {
            model: "claude-3-haiku-20240307".to_string(),
            max_tokens: 1,
            messages: vec![WireMessage {
                role: "user".to_string(),
                content: "Hi".to_string(),
            }],
            system: None,
            temperature: None,
            top_p: None,
            stop_sequences: None,
        };

        match self.post_messages(&probe).await {
            Ok(_) => Ok(()),
            Err(LlmError::NetworkError(e)) => Err(LlmError::NetworkError(e)),
            Err(_) => Err(LlmError::AuthenticationFailed(
                "Anthropic API authentication failed".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    content: Vec<WireBlock>,
    model: String,
    stop_reason: Option<String>,
    usage: WireUsage,
}

#[derive(Debug, Deserialize)]
struct WireBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    input_tokens: u32,
    output_tokens: u32,
}
