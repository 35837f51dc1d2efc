use super::similarity::ratio;
use crate::config::MatcherConfig;

/// Ambiguity filter applies to utterances with at most this many words.
pub const FORCED_MAX_TOKENS: usize = 2;
/// Full ratio against an ambiguous word above which the backend is forced.
pub const FORCED_RATIO_THRESHOLD: f64 = 90.0;

/// Short affirmations and question words. Recognizers produce these from noise
/// often enough that they collide with short command triggers.
pub const AMBIGUOUS_WORDS: [&str; 15] = [
    "yes", "no", "okay", "ok", "yep", "nope", "yeah", "nah", "why", "who", "what", "where",
    "when", "how", "answer",
];

/// Routes short ambiguous utterances straight to the language backend.
#[derive(Debug, Clone)]
pub struct ForcedFallbackFilter {
    words: Vec<String>,
    max_tokens: usize,
    threshold: f64,
}

impl Default for ForcedFallbackFilter {
    fn default() -> Self {
        Self::new(
            AMBIGUOUS_WORDS.iter().map(|w| w.to_string()).collect(),
            FORCED_MAX_TOKENS,
            FORCED_RATIO_THRESHOLD,
        )
    }
}

impl ForcedFallbackFilter {
    pub fn new(words: Vec<String>, max_tokens: usize, threshold: f64) -> Self {
        Self {
            words: words.into_iter().map(|w| w.trim().to_lowercase()).collect(),
            max_tokens,
            threshold,
        }
    }

    pub fn from_config(config: &MatcherConfig) -> Self {
        Self::new(config.forced_words.clone(), config.forced_max_tokens, config.forced_threshold)
    }

    pub fn should_force_llm(&self, utterance: &str) -> bool {
        let text = utterance.trim().to_lowercase();
        let tokens = text.split_whitespace().count();
        if tokens == 0 || tokens > self.max_tokens {
            return false;
        }
        self.words.iter().any(|word| ratio(&text, word) > self.threshold)
    }
}
