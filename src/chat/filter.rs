//! Extractive answer filtering for catalog content
//!
//! Stored page content is too long to return wholesale, so replies quote the
//! few sentences most relevant to the visitor's question.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum number of sentences quoted in a content answer
pub const MAX_ANSWER_SENTENCES: usize = 3;

// A sentence ends at ., ? or ! followed by whitespace. The terminator stays
// with the sentence; the whitespace is consumed.
static SENTENCE_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.?!]\s+").unwrap());

/// Split text into sentences, keeping the terminating punctuation
pub fn split_sentences(content: &str) -> Vec<&str> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut sentences = Vec::new();
    let mut start = 0;
    for boundary in SENTENCE_BOUNDARY.find_iter(trimmed) {
        // The terminator is a single ASCII byte, so the sentence ends one
        // byte into the match.
        let end = boundary.start() + 1;
        sentences.push(&trimmed[start..end]);
        start = boundary.end();
    }
    if start < trimmed.len() {
        sentences.push(&trimmed[start..]);
    }

    sentences
}

/// Select the sentences of `content` most relevant to `query`
///
/// Each sentence is scored by how many of the query's words it contains
/// (case-insensitive substring containment). Sentences with at least one hit
/// are kept, ordered by descending score; ties keep their original order. If
/// no sentence matches at all, the leading sentences are returned instead so
/// the caller always gets something to show.
pub fn smart_filter(content: &str, query: &str, max_sentences: usize) -> String {
    let sentences = split_sentences(content);
    let query_words: Vec<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let mut scored: Vec<(usize, &str)> = Vec::new();
    for &sentence in &sentences {
        let lowered = sentence.to_lowercase();
        let score = query_words
            .iter()
            .filter(|word| lowered.contains(word.as_str()))
            .count();
        if score > 0 {
            scored.push((score, sentence));
        }
    }

    // Stable sort: equal scores stay in document order
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let top: Vec<&str> = scored
        .iter()
        .take(max_sentences)
        .map(|(_, sentence)| *sentence)
        .collect();

    if !top.is_empty() {
        top.join(" ")
    } else {
        sentences
            .iter()
            .take(max_sentences)
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}
