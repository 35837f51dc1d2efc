//! Runtime configuration
//!
//! Every field has a default, so an absent or partial TOML file is valid.
//!
//! ```toml
//! [matcher]
//! scorer = "token_sort"
//! token_sort_threshold = 70.0
//!
//! [session]
//! suffix_probability = 0.0
//!
//! [backend]
//! base_url = "http://localhost:1234/v1"
//! timeout_secs = 15
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::kernel::formatter::SUFFIX_PROBABILITY;
use crate::kernel::intent::fallback::{AMBIGUOUS_WORDS, FORCED_MAX_TOKENS, FORCED_RATIO_THRESHOLD};
use crate::kernel::intent::matcher::{
    FULL_RATIO_THRESHOLD, GUARD_FULL_RATIO, GUARD_LENGTH_RATIO, PARTIAL_RATIO_THRESHOLD,
    TOKEN_SORT_THRESHOLD,
};
use crate::kernel::state::DEFAULT_HISTORY_CAPACITY;
use crate::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub matcher: MatcherConfig,
    pub session: SessionConfig,
    pub backend: BackendConfig,
    pub speech: SpeechConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    #[default]
    Standard,
    TokenSort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    pub scorer: ScorerKind,
    pub full_threshold: f64,
    pub partial_threshold: f64,
    pub token_sort_threshold: f64,
    pub guard_length_ratio: f64,
    pub guard_full_threshold: f64,
    pub forced_words: Vec<String>,
    pub forced_max_tokens: usize,
    pub forced_threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            scorer: ScorerKind::Standard,
            full_threshold: FULL_RATIO_THRESHOLD,
            partial_threshold: PARTIAL_RATIO_THRESHOLD,
            token_sort_threshold: TOKEN_SORT_THRESHOLD,
            guard_length_ratio: GUARD_LENGTH_RATIO,
            guard_full_threshold: GUARD_FULL_RATIO,
            forced_words: AMBIGUOUS_WORDS.iter().map(|w| w.to_string()).collect(),
            forced_max_tokens: FORCED_MAX_TOKENS,
            forced_threshold: FORCED_RATIO_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub history_capacity: usize,
    /// Probability of addressing the user as "sir" on a given reply.
    pub suffix_probability: f64,
    pub assistant_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            suffix_probability: SUFFIX_PROBABILITY,
            assistant_name: "Jarvis".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// OpenAI-compatible root, e.g. LM Studio's local server.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1234/v1".to_string(),
            api_key: "lm-studio".to_string(),
            model: "local-model".to_string(),
            temperature: 0.2,
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechMode {
    /// Pipe replies through a synthesizer program.
    #[default]
    Command,
    /// Console echo only.
    Silent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub mode: SpeechMode,
    /// Synthesizer binary; `say` on macOS and `espeak` elsewhere when unset.
    pub program: Option<String>,
    /// Extra arguments placed before the text.
    pub args: Vec<String>,
}

impl Config {
    /// Load and validate a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed, or fails validation
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parse and validate TOML text
    ///
    /// # Errors
    ///
    /// Returns error on malformed TOML or out-of-range values
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the dispatcher cannot run with
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the offending field
    pub fn validate(&self) -> Result<()> {
        let m = &self.matcher;
        for (name, value) in [
            ("matcher.full_threshold", m.full_threshold),
            ("matcher.partial_threshold", m.partial_threshold),
            ("matcher.token_sort_threshold", m.token_sort_threshold),
            ("matcher.guard_full_threshold", m.guard_full_threshold),
            ("matcher.forced_threshold", m.forced_threshold),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(Error::Config(format!("{} must be within 0-100, got {}", name, value)));
            }
        }
        if !(0.0..=1.0).contains(&m.guard_length_ratio) {
            return Err(Error::Config(format!(
                "matcher.guard_length_ratio must be within 0-1, got {}",
                m.guard_length_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.session.suffix_probability) {
            return Err(Error::Config(format!(
                "session.suffix_probability must be within 0-1, got {}",
                self.session.suffix_probability
            )));
        }
        if self.session.history_capacity == 0 {
            return Err(Error::Config("session.history_capacity must be at least 1".to_string()));
        }
        if self.backend.timeout_secs == 0 {
            return Err(Error::Config("backend.timeout_secs must be at least 1".to_string()));
        }
        if self.backend.base_url.trim().is_empty() {
            return Err(Error::Config("backend.base_url must not be empty".to_string()));
        }
        Ok(())
    }
}
