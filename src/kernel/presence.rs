use serde::{Deserialize, Serialize};

/// Dispatcher lifecycle for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DispatchState {
    /// Constructed, greeting not yet issued.
    Idle,
    /// Waiting for a finalized utterance.
    Listening,
    /// Forced-fallback filter and matcher running.
    Classifying,
    /// Intent action or backend call in progress.
    Executing,
    /// Formatting and recording the turn.
    Responding,
    /// Terminal. Farewell issued, nothing else accepted.
    ShuttingDown,
}

impl Default for DispatchState {
    fn default() -> Self {
        Self::Idle
    }
}

impl DispatchState {
    pub fn is_terminal(self) -> bool {
        self == Self::ShuttingDown
    }
}

/// Requests a transition. The graph decides whether it is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchRequest {
    SessionStart,
    UtteranceFinalized,
    Classified,
    ShutdownMatched,
    ResponseReady,
    TurnRecorded,
}

pub struct DispatchGraph;

impl DispatchGraph {
    /// Pure function: (current, request) -> next. `None` for illegal transitions.
    pub fn transition(current: DispatchState, request: DispatchRequest) -> Option<DispatchState> {
        use DispatchRequest::*;
        use DispatchState::*;

        match (current, request) {
            (Idle, SessionStart) => Some(Listening),
            (Listening, UtteranceFinalized) => Some(Classifying),
            (Classifying, Classified) => Some(Executing),
            // Only an executed shutdown intent ends the session
            (Executing, ShutdownMatched) => Some(ShuttingDown),
            (Executing, ResponseReady) => Some(Responding),
            (Responding, TurnRecorded) => Some(Listening),
            _ => None,
        }
    }
}
