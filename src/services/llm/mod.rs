//! Language backend: the trait the dispatcher talks to, the adapter that
//! builds persona prompts around it, and the OpenAI-compatible HTTP client.

pub mod adapter;
pub mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use adapter::{BackendAdapter, BackendOutcome, OutcomeKind};
pub use client::LlmService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("request timed out")]
    Timeout,
    #[error("{0}")]
    Other(String),
}

/// Chat-style request/response. One completion per request, no streaming.
#[async_trait]
pub trait LanguageBackend: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String, BackendError>;
}
