//! Visitor message resolution
//!
//! Turns a raw chat message into an answer string. The pipeline tries cheap
//! local strategies first (intent table, contact directory, site content) and
//! only reaches for the language model when none of them produce a reply.

pub mod contacts;
pub mod filter;
pub mod language;
pub mod pipeline;

pub use contacts::{Contact, ContactDirectory};
pub use filter::{smart_filter, split_sentences, MAX_ANSWER_SENTENCES};
pub use language::Language;
pub use pipeline::{Answer, AnswerSource, ChatPipeline};
