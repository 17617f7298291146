//! Model completion surface used by the fallback step
//!
//! The resolution pipeline only needs one operation from a model vendor:
//! turn a short conversation into a completion. Everything vendor-specific
//! lives behind [`LlmProvider`] so the pipeline and its tests never touch
//! HTTP details.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One turn of a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

/// Who wrote a conversation turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// What the pipeline asks a provider for
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub model: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub stop_sequences: Option<Vec<String>>,
}

/// What a provider hands back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text; `None` when the vendor withheld the content
    pub content: Option<String>,
    pub model: String,
    pub usage: TokenUsage,
    pub finish_reason: FinishReason,
}

/// Token accounting reported by the vendor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Why generation stopped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Error,
}

/// A model vendor the fallback step can call
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider label ("openai", "anthropic")
    fn name(&self) -> &str;

    /// Run one completion. A single attempt per call; the caller decides
    /// whether a failure is fatal.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Cheap reachability and credential probe
    async fn health_check(&self) -> Result<(), LlmError>;
}

/// Failures a provider call can produce
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("API error: {0}")]
    ApiError(String),
}
