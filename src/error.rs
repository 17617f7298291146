//! Error types for the chat backend
//!
//! Every failure that reaches a visitor is rendered through
//! [`ChatError::user_message`], which redacts anything secret-shaped before
//! the string leaves the process.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Main error type for chat operations
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("Completion failed: {message}")]
    Completion { message: String },

    #[error("Content store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ChatError {
    pub fn completion<S: Into<String>>(message: S) -> Self {
        Self::Completion {
            message: message.into(),
        }
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The answer string the HTTP API sends for this error
    pub fn user_message(&self) -> String {
        match self {
            ChatError::EmptyMessage => "❌ Please type something.".to_string(),
            ChatError::Completion { message } => {
                format!("❌ Assistant error: {}", sanitize_error_message(message))
            }
            other => format!(
                "❌ Assistant error: {}",
                sanitize_error_message(&other.to_string())
            ),
        }
    }
}

// Credential assignments like "api_key=sk-..." or "password: hunter2"
static SECRET_ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(password|token|key|secret)[=:]\s*\S+").unwrap());

// Paths under credential directories that may leak in I/O errors
static SECRET_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/[a-zA-Z0-9._/-]+/(secrets?|\.ssh|\.aws|\.config)/[a-zA-Z0-9._/-]+").unwrap()
});

const MAX_USER_MESSAGE_LEN: usize = 500;

/// Strip secret-shaped substrings and bound the length of an error string
pub fn sanitize_error_message(message: &str) -> String {
    let sanitized = SECRET_ASSIGNMENT.replace_all(message, "${1}=***");
    let mut sanitized = SECRET_PATH
        .replace_all(&sanitized, "/***REDACTED***/")
        .into_owned();

    if sanitized.len() > MAX_USER_MESSAGE_LEN {
        let suffix = "...[truncated]";
        let mut cut = MAX_USER_MESSAGE_LEN - suffix.len();
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str(suffix);
    }

    sanitized
}

/// Result type for chat operations
pub type ChatResult<T> = Result<T, ChatError>;
