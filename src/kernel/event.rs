use serde::{Deserialize, Serialize};

use super::intent::MatchResult;
use crate::services::llm::OutcomeKind;

/// How one utterance was handled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Route {
    /// Nothing to classify (blank input).
    Ignored,
    /// Short ambiguous utterance sent to the backend without consulting the matcher.
    ForcedFallback(OutcomeKind),
    Intent(MatchResult),
    /// No intent matched.
    Backend(OutcomeKind),
    Shutdown,
}

/// Effects the dispatcher asks its driver to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// `blocking` speech must finish before the driver continues.
    Speak { text: String, blocking: bool },
    Shutdown,
}
