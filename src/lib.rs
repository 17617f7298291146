//! Dhonk Craft chat backend
//!
//! HTTP backend that answers visitor questions for Dhonk Craft, a craft
//! enterprise near Ranthambhore that trains and employs local women artisans.
//!
//! # Overview
//!
//! A visitor message works through four resolution strategies in order:
//! - Intent table for greetings and pleasantries
//! - Contact directory for founder and general manager details
//! - Site content lookup in Postgres, filtered to the most relevant sentences
//! - Model completion in the visitor's language (English or Hindi)
//!
//! # Quick Start
//!
//! ```rust
//! use dhonk_chat::chat::{smart_filter, Language, MAX_ANSWER_SENTENCES};
//!
//! // Pick the reply language from the script of the message
//! let language = Language::detect("बैग की कीमत क्या है?");
//! assert_eq!(language.as_str(), "hi");
//!
//! // Trim a page of content down to the sentences that matter
//! let content = "Dhonk Craft trains local women artisans. Our bags are block printed by hand. Shipping takes five days.";
//! let answer = smart_filter(content, "how is a bag printed", MAX_ANSWER_SENTENCES);
//! assert!(answer.contains("block printed"));
//! ```

pub mod chat;
pub mod config;
pub mod error;
pub mod intent;
pub mod llm;
pub mod observability;
pub mod server;
pub mod store;
pub mod testing;

pub use chat::{Answer, AnswerSource, ChatPipeline, ContactDirectory, Language};
pub use config::*;
pub use error::{ChatError, ChatResult};
pub use intent::{IntentClassifier, IntentMatch, KeywordIntentClassifier};
pub use server::ChatServer;
pub use store::{ContentRecord, ContentStore, PgContentStore, StoreError};
