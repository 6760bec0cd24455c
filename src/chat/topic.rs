//! Heuristic text classification for the dialogue core
//!
//! Topic extraction, follow-up detection, and domain-relevance checks are
//! all plain word-list heuristics. The lists are fixed and exposed as named
//! constants so each predicate can be tested on its own. They are known to
//! mis-segment topics spanning more than three words; that approximation is
//! accepted rather than patched case by case.

/// Tokens that usually terminate a disease name ("bean rust", "leaf spot").
const DISEASE_INDICATORS: &[&str] = &[
    "leaf", "spot", "blight", "rot", "rust", "mildew", "wilt", "mold", "canker", "disease",
];

/// Generic words skipped when looking for a meaningful topic.
const STOP_WORDS: &[&str] = &[
    "how", "can", "i", "grow", "about", "what", "is", "tell", "me", "more", "explain", "the",
    "a", "an", "this", "that", "these", "those", "my", "your", "our", "their",
];

/// Phrases that mark a message as continuing the previous topic.
const FOLLOW_UP_PHRASES: &[&str] = &[
    "tell me more",
    "explain more",
    "continue",
    "elaborate",
    "go on",
    "what else",
    "more details",
    "how to treat",
    "treatment",
    "how to fix",
    "how to cure",
    "is there a way",
    "can i",
    "should i",
    "this disease",
    "the disease",
    "this problem",
    "the problem",
];

/// Single words that mark a follow-up when they appear as whole words.
const FOLLOW_UP_WORDS: &[&str] = &["and", "this", "it"];

/// A message mentioning any of these is considered in-domain.
const FARMING_KEYWORDS: &[&str] = &[
    "plant",
    "crop",
    "soil",
    "disease",
    "pest",
    "irrigation",
    "fertilizer",
    "harvest",
    "seed",
    "growth",
    "garden",
    "farm",
    "agriculture",
    "cultivation",
    "organic",
    "compost",
    "weather",
    "season",
    "yield",
    "nutrient",
    "weed",
];

/// Topics the assistant explicitly declines.
const OFF_TOPIC_KEYWORDS: &[&str] = &[
    "politics",
    "sports",
    "entertainment",
    "movie",
    "game",
    "celebrity",
    "stock market",
    "music",
    "travel",
];

/// Longest follow-up message, in whitespace-separated tokens.
const SHORT_MESSAGE_TOKENS: usize = 5;

/// Infer a short topic string from a user message.
///
/// Disease-indicator tokens win: the last indicator found (at a non-initial
/// position) is joined with up to two preceding words, which favors full
/// disease names like "bacterial leaf spot" over a bare "leaf". Scanning from
/// the end matters for phrases such as "tomato leaf blight", where the first
/// indicator ("leaf") would cut the name short. Without an indicator, the
/// first one or two meaningful words are used; very short or entirely generic
/// messages yield no topic.
pub fn extract_topic(message: &str) -> Option<String> {
    let cleaned = message
        .to_lowercase()
        .replace(['?', '.', '!'], "");
    let words: Vec<&str> = cleaned.split_whitespace().collect();

    for (i, word) in words.iter().enumerate().rev() {
        if i > 0 && DISEASE_INDICATORS.contains(word) {
            let start = i.saturating_sub(2);
            return Some(words[start..=i].join(" "));
        }
    }

    let meaningful: Vec<&str> = words
        .iter()
        .copied()
        .filter(|w| !STOP_WORDS.contains(w) && w.len() > 2)
        .collect();

    match meaningful.len() {
        0 => None,
        1 => Some(meaningful[0].to_string()),
        _ => Some(meaningful[..2].join(" ")),
    }
}

/// Classify a message as a follow-up to the previous topic.
///
/// Intentionally broad: most short messages are treated as follow-ups. The
/// single-word triggers match whole words only, so "it" does not fire on
/// "with" or "citrus".
pub fn is_follow_up(message: &str) -> bool {
    let lower = message.to_lowercase();

    FOLLOW_UP_PHRASES.iter().any(|p| lower.contains(p))
        || lower.split_whitespace().count() <= SHORT_MESSAGE_TOKENS
        || lower.starts_with("how")
        || FOLLOW_UP_WORDS.iter().any(|w| contains_word(&lower, w))
}

/// Whether the message falls within the assistant's farming domain.
pub fn is_farming_related(message: &str) -> bool {
    let lower = message.to_lowercase();
    FARMING_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Whether the message matches a topic the assistant declines outright.
pub fn is_off_topic(message: &str) -> bool {
    let lower = message.to_lowercase();
    OFF_TOPIC_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Whole-word containment over a lower-cased string.
fn contains_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|w| w == word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_disease_phrase() {
        let topic = extract_topic("How do I treat tomato leaf blight?").unwrap();
        assert!(topic.ends_with("blight"));
        assert_eq!(topic, "tomato leaf blight");
    }

    #[test]
    fn test_extract_multi_word_disease_name() {
        assert_eq!(
            extract_topic("what is bacterial leaf spot").as_deref(),
            Some("bacterial leaf spot")
        );
    }

    #[test]
    fn test_extract_meaningful_words_without_indicator() {
        assert_eq!(
            extract_topic("best fertilizer for tomatoes").as_deref(),
            Some("best fertilizer")
        );
    }

    #[test]
    fn test_extract_single_meaningful_word() {
        assert_eq!(extract_topic("tell me about tomatoes").as_deref(), Some("tomatoes"));
    }

    #[test]
    fn test_extract_no_topic_from_generic_message() {
        assert_eq!(extract_topic("ok"), None);
        assert_eq!(extract_topic("tell me more about this"), None);
    }

    #[test]
    fn test_follow_up_phrases() {
        assert!(is_follow_up("tell me more"));
        assert!(is_follow_up("Is there a way to prevent that from spreading?"));
        assert!(is_follow_up("how should farmers rotate their cereal crops"));
    }

    #[test]
    fn test_short_message_is_follow_up() {
        assert!(is_follow_up("why though"));
    }

    #[test]
    fn test_standalone_word_triggers() {
        assert!(is_follow_up("does the fungus survive winter and return in spring"));
        assert!(!is_follow_up("farmers market prices rose sharply across europe yesterday"));
    }

    #[test]
    fn test_it_does_not_match_inside_words() {
        // "citrus" and "with" contain "it" as a substring but not as a word
        assert!(!is_follow_up(
            "citrus orchards deal with heavy fruit losses every single summer"
        ));
    }

    #[test]
    fn test_long_neutral_message_is_not_follow_up() {
        assert!(!is_follow_up(
            "please summarize yesterday's regional agricultural commodity price report now"
        ));
    }

    #[test]
    fn test_farming_relevance() {
        assert!(is_farming_related("Which fertilizer suits sandy soil?"));
        assert!(!is_farming_related("Who won the election?"));
    }

    #[test]
    fn test_off_topic_detection() {
        assert!(is_off_topic("What's a good movie tonight?"));
        assert!(!is_off_topic("Who won the election?"));
    }
}
