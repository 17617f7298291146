//! OpenAI chat-completions backend
//!
//! Default provider for the model fallback. Speaks the `/chat/completions`
//! wire format and maps OpenAI status codes onto [`LlmError`] variants.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::llm::provider::{
    CompletionRequest, CompletionResponse, FinishReason, LlmError, LlmProvider, MessageRole,
    TokenUsage,
};

/// Connection settings for the OpenAI API
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() {
            return Err(LlmError::NotConfigured(
                "OpenAI API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn wire_request(&self, request: &CompletionRequest) -> ChatRequestBody {
        let messages = request
            .messages
            .iter()
            .map(|m| ChatMessage {
                role: match m.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: Some(m.content.clone()),
            })
            .collect();

        ChatRequestBody {
            model: request.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            stop: request.stop_sequences.clone(),
        }
    }

    async fn post_completion(&self, body: &ChatRequestBody) -> Result<ChatResponseBody, LlmError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(
                    "OpenAI request did not complete: {} (connect: {}, timeout: {})",
                    e,
                    e.is_connect(),
                    e.is_timeout()
                );
                LlmError::NetworkError(format!("HTTP request failed: {e}"))
            })?;

        let status = response.status();

        if status.is_server_error() {
            let detail = response.text().await.unwrap_or_default();
            warn!("OpenAI returned {}: {}", status, detail);
            return Err(LlmError::ApiError(format!(
                "OpenAI API server error: {status} - {detail}"
            )));
        }

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!("OpenAI rejected the request ({}): {}", status, detail);

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(LlmError::RateLimitExceeded(format!(
                    "OpenAI API error: {status} - {detail}"
                )));
            }
            return Err(LlmError::ApiError(format!(
                "OpenAI API error: {status} - {detail}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))
    }
}

fn map_finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("stop") => FinishReason::Stop,
        Some("length") => FinishReason::Length,
        Some("content_filter") => FinishReason::ContentFilter,
        _ => FinishReason::Error,
    }
}

fn into_completion(body: ChatResponseBody) -> Result<CompletionResponse, LlmError> {
    let choice = body
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::ApiError("No choices returned from OpenAI".to_string()))?;

    Ok(CompletionResponse {
        content: choice.message.content,
        model: body.model,
        usage: TokenUsage {
            prompt_tokens: body.usage.prompt_tokens,
            completion_tokens: body.usage.completion_tokens,
            total_tokens: body.usage.total_tokens,
        },
        finish_reason: map_finish_reason(choice.finish_reason.as_deref()),
    })
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.wire_request(&request);
        debug!(
            model = %body.model,
            turns = body.messages.len(),
            "Sending completion to OpenAI"
        );

        let wire_response = self.post_completion(&body).await?;
        let response = into_completion(wire_response)?;
        debug!(
            total_tokens = response.usage.total_tokens,
            finish_reason = ?response.finish_reason,
            "OpenAI completion finished"
        );
        Ok(response)
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        let response = self
            .client
            .get(format!("{}/models", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(LlmError::AuthenticationFailed(
                "OpenAI API authentication failed".to_string(),
            ))
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequestBody {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseBody {
    model: String,
    choices: Vec<ChatChoice>,
    usage: ChatUsage,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
