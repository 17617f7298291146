//! Reply language selection
//!
//! Visitors write in English or Hindi; the model fallback answers in whichever
//! the message was written in. Detection is a simple script check: any
//! Devanagari character means Hindi.

/// System prompt used for English messages
pub const SYSTEM_PROMPT_EN: &str = "You are ONLY an AI assistant for Dhonk Craft, \
a craft enterprise near Ranthambhore, Rajasthan, that trains and employs local women artisans. \
Answer questions about Dhonk's handicrafts, block printing, t-shirts, bags, home decor, \
workshops, store visits, orders, shipping and contact details. \
Keep replies short, warm and factual. \
If a question is not about Dhonk Craft, politely explain that you can only help with Dhonk Craft.";

/// System prompt used for Hindi messages
pub const SYSTEM_PROMPT_HI: &str = "आप Dhonk Craft के लिए एक सहायक बॉट हैं। \
Dhonk Craft रणथंभौर, राजस्थान के पास एक हस्तशिल्प संस्था है जो स्थानीय महिला कारीगरों को \
प्रशिक्षण और रोज़गार देती है। उत्पादों, ब्लॉक प्रिंटिंग, टी-शर्ट, बैग, कार्यशालाओं, स्टोर विज़िट, \
ऑर्डर, शिपिंग और संपर्क विवरण के बारे में छोटे और विनम्र उत्तर दें। \
यदि प्रश्न Dhonk Craft से संबंधित नहीं है, तो विनम्रता से बताएं कि आप केवल Dhonk Craft के बारे में \
मदद कर सकते हैं।";

/// Language a reply should be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Hindi,
}

impl Language {
    /// Detect the reply language for a message
    pub fn detect(text: &str) -> Self {
        if contains_devanagari(text) {
            Language::Hindi
        } else {
            Language::English
        }
    }

    /// System prompt for this language
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Language::English => SYSTEM_PROMPT_EN,
            Language::Hindi => SYSTEM_PROMPT_HI,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
        }
    }
}

/// True if the text contains any character in the Devanagari block (U+0900-U+097F)
fn contains_devanagari(text: &str) -> bool {
    text.chars()
        .any(|c| ('\u{0900}'..='\u{097F}').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_message_detected_as_english() {
        assert_eq!(Language::detect("Where is your store?"), Language::English);
    }

    #[test]
    fn test_devanagari_message_detected_as_hindi() {
        assert_eq!(Language::detect("आपका स्टोर कहाँ है?"), Language::Hindi);
    }

    #[test]
    fn test_mixed_script_message_detected_as_hindi() {
        // A single Devanagari character is enough
        assert_eq!(Language::detect("Dhonk के products"), Language::Hindi);
    }

    #[test]
    fn test_empty_message_defaults_to_english() {
        assert_eq!(Language::detect(""), Language::English);
    }

    #[test]
    fn test_other_non_latin_scripts_are_not_hindi() {
        assert_eq!(Language::detect("你好"), Language::English);
        assert_eq!(Language::detect("مرحبا"), Language::English);
    }

    #[test]
    fn test_prompts_differ_per_language() {
        assert_ne!(
            Language::English.system_prompt(),
            Language::Hindi.system_prompt()
        );
        assert!(Language::Hindi.system_prompt().contains("Dhonk Craft"));
        assert!(Language::English.system_prompt().contains("Dhonk Craft"));
    }

    #[test]
    fn test_language_labels() {
        assert_eq!(Language::English.as_str(), "en");
        assert_eq!(Language::Hindi.as_str(), "hi");
    }
}
