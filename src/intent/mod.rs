//! Intent detection for canned replies
//!
//! The first resolution strategy: common conversational messages (greetings,
//! thanks, goodbyes) are answered from a fixed rule table without touching the
//! store or the model. A rule may also name an intent without carrying a
//! response, in which case resolution continues down the chain.

/// A detected intent and its canned response, if it has one
#[derive(Debug, Clone, PartialEq)]
pub struct IntentMatch {
    pub label: String,
    pub response: Option<String>,
}

/// Classifies a message into an intent
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, message: &str) -> Option<IntentMatch>;
}

/// One row of the keyword rule table
#[derive(Debug, Clone)]
pub struct IntentRule {
    pub label: String,
    pub keywords: Vec<String>,
    pub response: Option<String>,
}

impl IntentRule {
    pub fn new<L, K, R>(label: L, keywords: Vec<K>, response: Option<R>) -> Self
    where
        L: Into<String>,
        K: Into<String>,
        R: Into<String>,
    {
        Self {
            label: label.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
            response: response.map(Into::into),
        }
    }
}

/// Keyword-table classifier
///
/// Keywords match whole words only: the message is lowercased and split on
/// non-alphanumeric characters, so "hi" fires for "hi there" but not for
/// "hindi". Multi-word keywords match as word sequences. The first matching
/// rule wins.
pub struct KeywordIntentClassifier {
    rules: Vec<IntentRule>,
}

impl KeywordIntentClassifier {
    pub fn new(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    /// Lowercase and collapse a message to space-separated words
    fn normalize(message: &str) -> String {
        message
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn keyword_matches(normalized: &str, keyword: &str) -> bool {
        let padded = format!(" {normalized} ");
        padded.contains(&format!(" {keyword} "))
    }
}

impl Default for KeywordIntentClassifier {
    fn default() -> Self {
        Self::new(vec![
            IntentRule::new(
                "greeting",
                vec!["hello", "hi", "hey", "namaste", "namaskar"],
                Some("👋 Namaste! Welcome to Dhonk Craft. How can I help you today?"),
            ),
            IntentRule::new(
                "thanks",
                vec!["thanks", "thank you", "thankyou", "dhanyawad"],
                Some("🙏 You're welcome! Happy to help."),
            ),
            IntentRule::new(
                "goodbye",
                vec!["bye", "goodbye", "see you"],
                Some("👋 Goodbye! Do visit Dhonk Craft again."),
            ),
        ])
    }
}

impl IntentClassifier for KeywordIntentClassifier {
    fn classify(&self, message: &str) -> Option<IntentMatch> {
        let normalized = Self::normalize(message);
        if normalized.is_empty() {
            return None;
        }

        for rule in &self.rules {
            if rule
                .keywords
                .iter()
                .any(|keyword| Self::keyword_matches(&normalized, keyword))
            {
                return Some(IntentMatch {
                    label: rule.label.clone(),
                    response: rule.response.clone(),
                });
            }
        }

        None
    }
}
