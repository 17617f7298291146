//! Mock implementations for testing
//!
//! Provides mock IntentClassifier, ContentStore, and LlmProvider
//! implementations so the resolution chain can be tested without external
//! dependencies.

use crate::intent::{IntentClassifier, IntentMatch};
use crate::llm::provider::{
    CompletionRequest, CompletionResponse, FinishReason, LlmError, LlmProvider, TokenUsage,
};
use crate::store::{ContentRecord, ContentStore, StoreError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Scripted model provider
///
/// Serves its responses in order, cycling when it runs out, and records every
/// request so tests can assert on the prompts the pipeline built. A failing
/// instance still records the request before erroring.
#[derive(Debug)]
pub struct MockLlmProvider {
    pub responses: Vec<String>,
    pub current_response: Arc<Mutex<usize>>,
    pub should_fail: bool,
    pub received_requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockLlmProvider {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses,
            current_response: Arc::new(Mutex::new(0)),
            should_fail: false,
            received_requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Provider whose every call fails
    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::new(vec![])
        }
    }

    pub fn single_response(response: impl Into<String>) -> Self {
        Self::new(vec![response.into()])
    }

    pub async fn get_received_requests(&self) -> Vec<CompletionRequest> {
        self.received_requests.lock().await.clone()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.received_requests.lock().await.push(request);

        if self.should_fail {
            return Err(LlmError::RequestFailed("Mock LLM failure".to_string()));
        }

        let content = if self.responses.is_empty() {
            "Mock response".to_string()
        } else {
            let mut cursor = self.current_response.lock().await;
            let picked = self.responses[*cursor % self.responses.len()].clone();
            *cursor += 1;
            picked
        };

        Ok(CompletionResponse {
            content: Some(content),
            model: "mock-model".to_string(),
            usage: TokenUsage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            },
            finish_reason: FinishReason::Stop,
        })
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        if self.should_fail {
            Err(LlmError::RequestFailed(
                "Mock health check failure".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

/// Mock content store for testing
///
/// Emulates the ILIKE lookup: returns the shortest record whose content
/// contains the query, ignoring case. Records every query it receives.
#[derive(Debug, Default)]
pub struct MockContentStore {
    pub records: Vec<ContentRecord>,
    pub should_fail: bool,
    pub queries: Arc<Mutex<Vec<String>>>,
}

impl MockContentStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(records: Vec<ContentRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn with_record(record: ContentRecord) -> Self {
        Self::new(vec![record])
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    pub async fn get_queries(&self) -> Vec<String> {
        self.queries.lock().await.clone()
    }
}

#[async_trait]
impl ContentStore for MockContentStore {
    async fn find_best_match(&self, query: &str) -> Result<Option<ContentRecord>, StoreError> {
        self.queries.lock().await.push(query.to_string());

        if self.should_fail {
            return Err(StoreError::Unavailable(sqlx::Error::PoolTimedOut));
        }

        let needle = query.to_lowercase();
        Ok(self
            .records
            .iter()
            .filter(|record| record.content.to_lowercase().contains(&needle))
            .min_by_key(|record| record.content.len())
            .cloned())
    }
}

/// Mock intent classifier for testing
#[derive(Debug, Default)]
pub struct MockIntentClassifier {
    pub matched: Option<IntentMatch>,
}

impl MockIntentClassifier {
    /// Classifier that never matches
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_match(label: impl Into<String>, response: Option<&str>) -> Self {
        Self {
            matched: Some(IntentMatch {
                label: label.into(),
                response: response.map(str::to_string),
            }),
        }
    }
}

impl IntentClassifier for MockIntentClassifier {
    fn classify(&self, _message: &str) -> Option<IntentMatch> {
        self.matched.clone()
    }
}
