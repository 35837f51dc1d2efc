use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{BackendError, ChatMessage, ChatRequest, LanguageBackend, Role};
use crate::config::{BackendConfig, SessionConfig};
use crate::kernel::state::ConversationHistory;

pub const TIMEOUT_APOLOGY: &str =
    "Sir, the network operation timed out while waiting for a response from the LLM.";
pub const EMPTY_RESPONSE_FALLBACK: &str =
    "I have received your query, but the network response was null. Could you repeat that, sir?";

pub fn failure_message(detail: &str) -> String {
    format!("Sir, I seem to have lost connection to the mainframe. Error: {}", detail)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendOutcome {
    Success(String),
    Timeout,
    Failure(String),
}

/// Content-free view of an outcome, safe for telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    Success,
    Empty,
    Timeout,
    Failure,
}

impl BackendOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            BackendOutcome::Success(text) if text.is_empty() => OutcomeKind::Empty,
            BackendOutcome::Success(_) => OutcomeKind::Success,
            BackendOutcome::Timeout => OutcomeKind::Timeout,
            BackendOutcome::Failure(_) => OutcomeKind::Failure,
        }
    }

    /// User-visible text. Empty successes become a request to repeat.
    pub fn response_text(&self) -> String {
        match self {
            BackendOutcome::Success(text) if text.is_empty() => EMPTY_RESPONSE_FALLBACK.to_string(),
            BackendOutcome::Success(text) => text.clone(),
            BackendOutcome::Timeout => TIMEOUT_APOLOGY.to_string(),
            BackendOutcome::Failure(detail) => failure_message(detail),
        }
    }
}

/// Wraps a `LanguageBackend` with the persona prompt, context window and a
/// bounded wait. Never retries.
pub struct BackendAdapter {
    backend: Arc<dyn LanguageBackend>,
    assistant_name: String,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl BackendAdapter {
    pub fn new(
        backend: Arc<dyn LanguageBackend>,
        backend_config: &BackendConfig,
        session_config: &SessionConfig,
    ) -> Self {
        Self {
            backend,
            assistant_name: session_config.assistant_name.clone(),
            model: backend_config.model.clone(),
            temperature: backend_config.temperature,
            timeout: Duration::from_secs(backend_config.timeout_secs),
        }
    }

    /// Override the bounded wait (tests use milliseconds).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn system_instruction(&self, last_operation: &str) -> String {
        format!(
            "You are {name}, Tony Stark's witty and superior AI assistant. \
             Your responses must be in English. Answer in full sentences, \
             but be **extremely concise** and **avoid any excessive politeness, \
             introductions, or verbose filler phrases**. \
             Answer all questions using your internal knowledge. \
             Do not mention external search or real-time data needs. \
             Maintain factual accuracy. Respond directly to the user's input \
             with a touch of {name}'s dry humor. \
             The last internal operation was: {last_operation}. ",
            name = self.assistant_name,
            last_operation = last_operation,
        )
    }

    /// System instruction, then history oldest first, then the new utterance.
    pub fn build_messages(
        &self,
        utterance: &str,
        history: &ConversationHistory,
        last_operation: &str,
    ) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2 + history.len() * 2);
        messages.push(ChatMessage::new(Role::System, self.system_instruction(last_operation)));
        for turn in history.iter() {
            messages.push(ChatMessage::new(Role::User, turn.user.clone()));
            messages.push(ChatMessage::new(Role::Assistant, turn.assistant_context()));
        }
        messages.push(ChatMessage::new(Role::User, utterance));
        messages
    }

    pub fn build_request(
        &self,
        utterance: &str,
        history: &ConversationHistory,
        last_operation: &str,
    ) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: self.build_messages(utterance, history, last_operation),
            temperature: self.temperature,
        }
    }

    pub async fn generate(
        &self,
        utterance: &str,
        history: &ConversationHistory,
        last_operation: &str,
    ) -> BackendOutcome {
        let request = self.build_request(utterance, history, last_operation);
        let started = Instant::now();

        let reply = tokio::time::timeout(self.timeout, self.backend.complete(&request)).await;
        let outcome = match reply {
            Ok(Ok(text)) => BackendOutcome::Success(text.trim().to_string()),
            Ok(Err(BackendError::Timeout)) | Err(_) => {
                warn!(timeout_ms = self.timeout.as_millis() as u64, "language backend timed out");
                BackendOutcome::Timeout
            }
            Ok(Err(BackendError::Other(detail))) => {
                warn!(error = %detail, "language backend failed");
                BackendOutcome::Failure(detail)
            }
        };

        debug!(
            kind = ?outcome.kind(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "language backend returned"
        );
        outcome
    }
}
