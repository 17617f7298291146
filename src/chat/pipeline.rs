//! Resolution chain for visitor messages
//!
//! A message is answered by the first strategy that produces a reply:
//!
//! 1. Intent table (greetings, thanks, goodbyes)
//! 2. Contact directory (founder and general manager)
//! 3. Site content lookup, filtered to the most relevant sentences
//! 4. Model completion in the visitor's language
//!
//! A store failure is logged and skipped so the model can still answer. A
//! model failure ends the chain and surfaces to the caller.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::chat::contacts::ContactDirectory;
use crate::chat::filter::{smart_filter, MAX_ANSWER_SENTENCES};
use crate::chat::language::Language;
use crate::config::LlmSection;
use crate::error::{ChatError, ChatResult};
use crate::intent::IntentClassifier;
use crate::llm::provider::{CompletionRequest, LlmProvider, Message, MessageRole};
use crate::observability::metrics;
use crate::store::ContentStore;

/// Which strategy produced an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    Intent,
    Contact,
    Content,
    Model,
}

impl AnswerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerSource::Intent => "intent",
            AnswerSource::Contact => "contact",
            AnswerSource::Content => "content",
            AnswerSource::Model => "model",
        }
    }
}

/// A resolved answer and the strategy that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    pub source: AnswerSource,
}

/// Runs the resolution chain over injected strategy implementations
pub struct ChatPipeline {
    intents: Arc<dyn IntentClassifier>,
    contacts: ContactDirectory,
    store: Arc<dyn ContentStore>,
    provider: Arc<dyn LlmProvider>,
    llm: LlmSection,
}

impl ChatPipeline {
    pub fn new(
        intents: Arc<dyn IntentClassifier>,
        contacts: ContactDirectory,
        store: Arc<dyn ContentStore>,
        provider: Arc<dyn LlmProvider>,
        llm: LlmSection,
    ) -> Self {
        Self {
            intents,
            contacts,
            store,
            provider,
            llm,
        }
    }

    /// Resolve a visitor message to an answer
    pub async fn answer(&self, message: &str) -> ChatResult<Answer> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        if let Some(matched) = self.intents.classify(message) {
            match matched.response {
                Some(response) => {
                    debug!(intent = %matched.label, "Resolved from intent table");
                    return Ok(self.resolved(response, AnswerSource::Intent));
                }
                // An intent without a canned reply continues down the chain
                None => debug!(intent = %matched.label, "Intent matched without response"),
            }
        }

        if let Some(card) = self.contacts.lookup(message) {
            debug!("Resolved from contact directory");
            return Ok(self.resolved(card, AnswerSource::Contact));
        }

        if let Some(text) = self.lookup_content(message).await {
            return Ok(self.resolved(text, AnswerSource::Content));
        }

        let text = self.complete_with_model(message).await?;
        Ok(self.resolved(text, AnswerSource::Model))
    }

    fn resolved(&self, text: String, source: AnswerSource) -> Answer {
        metrics().answer_resolved(source.as_str());
        Answer { text, source }
    }

    /// Site content lookup; any store failure degrades to the next strategy
    async fn lookup_content(&self, message: &str) -> Option<String> {
        match self.store.find_best_match(message).await {
            Ok(Some(record)) => {
                debug!(title = %record.title, "Resolved from site content");
                let mut text = smart_filter(&record.content, message, MAX_ANSWER_SENTENCES);
                if let Some(url) = record.url.as_deref().filter(|u| !u.is_empty()) {
                    text = format!("{}\n\n🔗 [More Info]({})", text, url);
                }
                Some(text)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Content lookup failed, continuing to model: {}", e);
                metrics().content_lookup_failed();
                None
            }
        }
    }

    /// Ask the model, prompting in the visitor's language
    async fn complete_with_model(&self, message: &str) -> ChatResult<String> {
        let language = Language::detect(message);
        info!(
            language = language.as_str(),
            model = %self.llm.model,
            "Falling back to model completion"
        );

        let request = self.build_completion_request(message, language);
        let response = self
            .provider
            .complete(request)
            .await
            .map_err(|e| ChatError::completion(e.to_string()))?;

        response
            .content
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ChatError::completion("model returned an empty reply"))
    }

    /// Build the completion request (pure function)
    fn build_completion_request(&self, message: &str, language: Language) -> CompletionRequest {
        // Append current date to system prompt for temporal context
        let now = chrono::Utc::now();
        let date_info = format!(
            "\n\nCurrent date and time: {} UTC",
            now.format("%Y-%m-%d %H:%M:%S")
        );

        CompletionRequest {
            messages: vec![
                Message {
                    role: MessageRole::System,
                    content: format!("{}{}", language.system_prompt(), date_info),
                },
                Message {
                    role: MessageRole::User,
                    content: message.to_string(),
                },
            ],
            model: self.llm.model.clone(),
            max_tokens: self.llm.max_tokens,
            temperature: Some(self.llm.temperature),
            top_p: None,
            stop_sequences: None,
        }
    }
}
