//! Error types for the dispatcher

use thiserror::Error;

/// Result type alias for dispatcher operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Configuration value out of range or unreadable
    #[error("configuration error: {0}")]
    Config(String),

    /// Intent catalog violates its construction invariants
    #[error("catalog error: {0}")]
    Catalog(String),

    /// A collaborator could not be brought up (input, speech output)
    #[error("startup precondition failed: {0}")]
    Startup(String),

    /// The session already reached its terminal state
    #[error("session is shutting down; no further utterances accepted")]
    SessionClosed,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
