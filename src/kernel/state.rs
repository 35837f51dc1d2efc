use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::formatter::strip_suffix;

/// Turns kept as backend context.
pub const DEFAULT_HISTORY_CAPACITY: usize = 3;
/// Last-operation value before anything has happened.
pub const NO_OPERATION: &str = "None recorded.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub user: String,
    pub assistant: String,
}

impl Turn {
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }

    /// Assistant text as replayed to the backend, address suffix removed.
    pub fn assistant_context(&self) -> String {
        strip_suffix(&self.assistant)
    }
}

/// Fixed-capacity FIFO of completed turns. `len() <= capacity()` after every append.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    turns: VecDeque<Turn>,
    capacity: usize,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl ConversationHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.capacity {
            self.turns.pop_front();
        }
    }

    /// Oldest first.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// The only way session state mutates.
#[derive(Debug, Clone)]
pub enum StateDelta {
    /// A fully formed turn; history never sees half of one.
    TurnCompleted(Turn),
    OperationRecorded(String),
}

/// Everything one dispatch session owns. Single writer: the dispatcher.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub id: Uuid,
    history: ConversationHistory,
    last_operation: String,
    // Monotonic, bumped on every reduction
    pub version: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl SessionState {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            history: ConversationHistory::new(history_capacity),
            last_operation: NO_OPERATION.to_string(),
            version: 0,
        }
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn last_operation(&self) -> &str {
        &self.last_operation
    }

    pub fn reduce(&mut self, delta: StateDelta) {
        self.version += 1;
        match delta {
            StateDelta::TurnCompleted(turn) => self.history.append(turn),
            StateDelta::OperationRecorded(summary) => self.last_operation = summary,
        }
    }
}
