use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::{Catalog, IntentId, IntentKind};
use super::similarity::{partial_ratio, ratio, token_sort_ratio};
use crate::config::{MatcherConfig, ScorerKind};

/// Full-ratio score a trigger must exceed to match.
pub const FULL_RATIO_THRESHOLD: f64 = 85.0;
/// Partial-ratio score a trigger must exceed to match.
pub const PARTIAL_RATIO_THRESHOLD: f64 = 98.0;
/// Minimum score for the token-sort scorer.
pub const TOKEN_SORT_THRESHOLD: f64 = 70.0;
/// Below this trigger/utterance length ratio the guard kicks in.
pub const GUARD_LENGTH_RATIO: f64 = 0.5;
/// Guarded triggers survive only with a full ratio above this.
pub const GUARD_FULL_RATIO: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    /// Whole utterance resembles the trigger.
    ExactFuzzy,
    /// Trigger found inside a longer utterance.
    PartialFuzzy,
    TokenSort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub intent_id: IntentId,
    pub trigger: String,
    pub score: f64,
    pub kind: MatchKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scorer {
    /// Full ratio, with partial ratio as a second chance.
    Standard { full_threshold: f64, partial_threshold: f64 },
    /// Word-order insensitive; accepts at or above `threshold`.
    TokenSort { threshold: f64 },
}

impl Default for Scorer {
    fn default() -> Self {
        Scorer::Standard {
            full_threshold: FULL_RATIO_THRESHOLD,
            partial_threshold: PARTIAL_RATIO_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthGuard {
    pub min_length_ratio: f64,
    pub full_ratio_override: f64,
}

impl Default for LengthGuard {
    fn default() -> Self {
        Self {
            min_length_ratio: GUARD_LENGTH_RATIO,
            full_ratio_override: GUARD_FULL_RATIO,
        }
    }
}

impl LengthGuard {
    /// True when a short trigger would only match incidentally inside a much
    /// longer utterance.
    pub fn rejects(&self, trigger: &str, utterance: &str, full: f64) -> bool {
        let utterance_len = utterance.chars().count().max(1) as f64;
        let length_ratio = trigger.chars().count() as f64 / utterance_len;
        length_ratio < self.min_length_ratio && full <= self.full_ratio_override
    }
}

/// First-match-wins classifier over an ordered catalog.
///
/// Iteration follows catalog order and trigger order. The first trigger that
/// clears the scorer wins even if a later one would score higher.
#[derive(Debug, Clone, Default)]
pub struct FuzzyMatcher {
    scorer: Scorer,
    guard: LengthGuard,
}

impl FuzzyMatcher {
    pub fn new(scorer: Scorer, guard: LengthGuard) -> Self {
        Self { scorer, guard }
    }

    pub fn from_config(config: &MatcherConfig) -> Self {
        let scorer = match config.scorer {
            ScorerKind::Standard => Scorer::Standard {
                full_threshold: config.full_threshold,
                partial_threshold: config.partial_threshold,
            },
            ScorerKind::TokenSort => Scorer::TokenSort {
                threshold: config.token_sort_threshold,
            },
        };
        let guard = LengthGuard {
            min_length_ratio: config.guard_length_ratio,
            full_ratio_override: config.guard_full_threshold,
        };
        Self::new(scorer, guard)
    }

    pub fn scorer(&self) -> Scorer {
        self.scorer
    }

    /// `utterance` is lower-cased here; triggers already are.
    pub fn find(&self, utterance: &str, catalog: &Catalog) -> Option<MatchResult> {
        let text = utterance.trim().to_lowercase();

        for intent in catalog.intents() {
            let guarded = intent.kind() != IntentKind::Launch;

            for trigger in intent.triggers() {
                if let Some((score, kind)) = self.score(&text, trigger, guarded) {
                    debug!(
                        intent = intent.id(),
                        trigger = %trigger,
                        score,
                        ?kind,
                        "trigger accepted"
                    );
                    return Some(MatchResult {
                        intent_id: intent.id().to_string(),
                        trigger: trigger.clone(),
                        score,
                        kind,
                    });
                }
            }
        }
        None
    }

    fn score(&self, text: &str, trigger: &str, guarded: bool) -> Option<(f64, MatchKind)> {
        match self.scorer {
            Scorer::Standard { full_threshold, partial_threshold } => {
                let full = ratio(text, trigger);
                if guarded && self.guard.rejects(trigger, text, full) {
                    return None;
                }
                if full > full_threshold {
                    return Some((full, MatchKind::ExactFuzzy));
                }
                let partial = partial_ratio(text, trigger);
                if partial > partial_threshold {
                    return Some((partial, MatchKind::PartialFuzzy));
                }
                None
            }
            Scorer::TokenSort { threshold } => {
                let score = token_sort_ratio(text, trigger);
                if guarded && self.guard.rejects(trigger, text, score) {
                    return None;
                }
                (score >= threshold).then_some((score, MatchKind::TokenSort))
            }
        }
    }
}
