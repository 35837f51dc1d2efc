use serde::{Deserialize, Serialize};

use crate::kernel::intent::{IntentId, MatchKind};
use crate::services::llm::OutcomeKind;

// Allowed: ids, kinds, counts, durations
// Forbidden: utterance text, response text

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    /// The forced-fallback filter claimed the utterance.
    ForcedFallback,

    /// The fuzzy matcher ran over the catalog.
    MatcherConsulted,

    IntentMatched {
        intent_id: IntentId,
        kind: MatchKind,
    },

    BackendCall {
        outcome: OutcomeKind,
        latency_ms: u64,
    },

    LaunchAttempt {
        launched: bool,
    },

    SuffixApplied,

    TurnRecorded {
        history_len: usize,
    },

    Shutdown,
}
