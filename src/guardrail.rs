//! Keyword guardrail that keeps the chatbox on agricultural topics.
//!
//! Matching is plain substring containment, not word-boundary based, so a
//! term inside a longer word still counts ("ph" matches "phone").

/// Reply sent when a question is rejected by the guardrail.
pub const REFUSAL_REPLY: &str = "This chatbox is only for agriculture-related queries.";

const AGRI_KEYWORDS: &[&str] = &[
    "agriculture", "farming", "farmer", "crop", "crops", "soil", "irrigation",
    "pest", "pests", "fertilizer", "fertiliser", "fertilizers", "fertilisers",
    "seed", "seeds", "harvest", "sowing", "planting", "yield", "weather",
    "rain", "monsoon", "drought", "insect", "disease", "fungus", "weed",
    "livestock", "dairy", "goat", "poultry", "cattle", "tractor", "market price",
    "mandi", "commodity", "wheat", "rice", "paddy", "maize", "corn", "millet",
    "ragi", "jowar", "cotton", "turmeric", "spice", "horticulture", "greenhouse",
    "polyhouse", "compost", "vermicompost", "organic", "soil health", "ph",
    "drip", "sprinkler", "mulch", "irrigate", "nursery", "sapling", "fruit",
    "vegetable", "kharif", "rabi", "zayed", "fungicide", "herbicide", "pesticide",
    "extension", "krishi", "krishi kendra", "pruning", "grafting", "bud", "flower",
    "aquaculture", "fish", "bee", "apiculture", "sericulture", "silk",
];

// Kannada has no case, so these are matched against the raw input.
const AGRI_KEYWORDS_KN: &[&str] = &[
    "ಕೃಷಿ", "ರೈತ", "ಬೆಳೆ", "ಮಣ್ಣು", "ನೀರಾವರಿ", "ಕೀಟ", "ಗೊಬ್ಬರ", "ಬೀಜ", "ಕೊಯ್ಲು",
    "ಹವಾಮಾನ", "ಮಳೆ", "ಬರ", "ರೋಗ", "ಹುಳು", "ಹುಲ್ಲುನಾಶಕ", "ಕೀಟನಾಶಕ", "ಸಸ್ಯ",
    "ಪಶುಸಂಗೋಪನೆ", "ಹಸು", "ಆಡು", "ಕೋಳಿ", "ಟ್ರಾಕ್ಟರ್", "ಮಾರುಕಟ್ಟೆ", "ಬೆಲೆ", "ಗೋಧಿ",
    "ಅಕ್ಕಿ", "ಜೋಳ", "ರಾಗಿ", "ಜೋವಾರಿ", "ಕಾಟನ್", "ಅರಿಶಿನ", "ತೋಟಗಾರಿಕೆ", "ಗ್ರೀನ್",
    "ಪಾಲಿಹೌಸ್", "ಕಾಂಪೋಸ್ಟ್", "ಸಾವಯವ", "ಪಿಹೆಚ್", "ಡ್ರಿಪ್", "ಸ್ಪ್ರಿಂಕ್ಲರ್", "ನರ್ಸರಿ",
    "ಚಿಗುರು", "ಹಣ್ಣು", "ತರಕಾರಿ",
];

/// English (Latin script) agriculture terms, all lowercase.
pub static ENGLISH_KEYWORDS: KeywordSet = KeywordSet::new(AGRI_KEYWORDS, true);

/// Kannada agriculture terms.
pub static KANNADA_KEYWORDS: KeywordSet = KeywordSet::new(AGRI_KEYWORDS_KN, false);

/// An immutable list of terms matched by substring containment.
#[derive(Debug, Clone, Copy)]
pub struct KeywordSet {
    terms: &'static [&'static str],
    fold_case: bool,
}

impl KeywordSet {
    /// `fold_case` lowercases the input before matching; the terms
    /// themselves must already be lowercase.
    pub const fn new(terms: &'static [&'static str], fold_case: bool) -> Self {
        Self { terms, fold_case }
    }

    pub fn terms(&self) -> &'static [&'static str] {
        self.terms
    }

    pub fn matches(&self, text: &str) -> bool {
        if self.fold_case {
            let lower = text.to_lowercase();
            self.terms.iter().any(|term| lower.contains(term))
        } else {
            self.terms.iter().any(|term| text.contains(term))
        }
    }
}

/// Returns true when `text` mentions any English or Kannada agriculture term.
pub fn is_agri_related(text: &str) -> bool {
    ENGLISH_KEYWORDS.matches(text) || KANNADA_KEYWORDS.matches(text)
}
