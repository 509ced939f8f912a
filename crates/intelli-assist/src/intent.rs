//! Keyword-based intent classification

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

const HEALTH_KEYWORDS: &[&str] = &[
    "fever", "cough", "sore throat", "throat", "chest pain", "shortness of breath", "nausea",
    "vomit", "diarrhea", "rash", "headache", "migraine", "asthma", "flu", "cold", "infection",
    "pain", "burn", "cut", "bleeding", "dizzy", "fatigue", "tired", "symptom", "medicine",
    "medication",
];

const PLACES_KEYWORDS: &[&str] = &[
    "near me", "nearby", "address", "restaurant", "restaurants", "park", "parks", "nightclub",
    "club", "bar", "shop", "store", "mall", "supermarket", "pharmacy", "clinic", "hospital",
    "embassy", "museum", "hotel", "cafe", "coffee", "library", "cinema", "theater", "bus stop",
    "station", "airport", "bank", "atm",
];

/// Coarse category of a user query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Symptom triage
    Health,
    /// Place and address lookup
    Places,
    /// Everything else goes to the QA engine
    General,
}

impl Intent {
    /// Classify a query.
    ///
    /// Rules, first match wins:
    /// - a place keyword, or the words find/where/nearest/closest/show -> Places
    /// - a symptom keyword -> Health
    /// - otherwise -> General
    ///
    /// Keywords are plain substring matches, so "cut" also matches "cute".
    pub fn classify(text: &str) -> Self {
        let t = text.trim().to_lowercase();

        if PLACES_KEYWORDS.iter().any(|k| t.contains(k)) || place_verb().is_match(&t) {
            return Self::Places;
        }

        if HEALTH_KEYWORDS.iter().any(|k| t.contains(k)) {
            return Self::Health;
        }

        Self::General
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Places => "places",
            Self::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn place_verb() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(find|where|nearest|closest|show)\b").expect("valid place verb regex")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_places() {
        assert_eq!(Intent::classify("Find parks in Berlin"), Intent::Places);
        assert_eq!(Intent::classify("Where can I eat?"), Intent::Places);
        assert_eq!(Intent::classify("pharmacy open late"), Intent::Places);
        assert_eq!(Intent::classify("closest ATM"), Intent::Places);
    }

    #[test]
    fn test_health() {
        assert_eq!(Intent::classify("I have a sore throat"), Intent::Health);
        assert_eq!(Intent::classify("Terrible HEADACHE since morning"), Intent::Health);
        assert_eq!(Intent::classify("feeling dizzy"), Intent::Health);
    }

    #[test]
    fn test_places_checked_before_health() {
        // "hospital" is a place keyword even though the query mentions pain
        assert_eq!(Intent::classify("chest pain, nearest hospital"), Intent::Places);
    }

    #[test]
    fn test_general() {
        assert_eq!(Intent::classify("Why is the sky blue?"), Intent::General);
        assert_eq!(Intent::classify("What is the capital of France?"), Intent::General);
        assert_eq!(Intent::classify(""), Intent::General);
    }

    #[test]
    fn test_verbs_need_word_boundaries() {
        // "showcase" does not contain the word "show"
        assert_eq!(Intent::classify("a showcase of sculptures"), Intent::General);
    }

    #[test]
    fn test_display() {
        assert_eq!(Intent::Health.to_string(), "health");
        assert_eq!(
            serde_json::to_string(&Intent::General).unwrap(),
            "\"general\""
        );
    }
}
