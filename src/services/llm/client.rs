use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{BackendError, ChatRequest, LanguageBackend};
use crate::config::BackendConfig;
use crate::Result;

/// OpenAI-compatible chat completions client (LM Studio, llama-server, ...).
#[derive(Clone)]
pub struct LlmService {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl LlmService {
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            // Network-level cap; the adapter enforces the same bound around the call
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn classify(error: reqwest::Error) -> BackendError {
    if error.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Other(error.to_string())
    }
}

/// Text of the first choice, trimmed. A null content reads as empty; no choice at
/// all is a failure.
pub(crate) fn extract_content(body: &str) -> std::result::Result<String, BackendError> {
    let parsed: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| BackendError::Other(format!("malformed completion response: {}", e)))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| BackendError::Other("no choices in completion response".to_string()))?;

    Ok(choice.message.content.unwrap_or_default().trim().to_string())
}

#[async_trait]
impl LanguageBackend for LlmService {
    async fn complete(&self, request: &ChatRequest) -> std::result::Result<String, BackendError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Other(format!("LLM server error: {}", status)));
        }

        let body = response.text().await.map_err(classify)?;
        extract_content(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_choice_trimmed() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  Indeed, sir.\n"}}]}"#;
        assert_eq!(extract_content(body).unwrap(), "Indeed, sir.");
    }

    #[test]
    fn null_content_reads_as_empty() {
        let body = r#"{"choices":[{"message":{"content":null}}]}"#;
        assert_eq!(extract_content(body).unwrap(), "");
    }

    #[test]
    fn missing_choices_are_a_failure() {
        assert_eq!(
            extract_content(r#"{"choices":[]}"#),
            Err(BackendError::Other("no choices in completion response".to_string()))
        );
        assert!(matches!(extract_content("{}"), Err(BackendError::Other(_))));
    }

    #[test]
    fn garbage_is_a_failure() {
        assert!(matches!(extract_content("<html>"), Err(BackendError::Other(_))));
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let config = BackendConfig {
            base_url: "http://localhost:1234/v1/".to_string(),
            ..BackendConfig::default()
        };
        let service = LlmService::new(&config).unwrap();
        assert_eq!(service.endpoint(), "http://localhost:1234/v1/chat/completions");
    }
}
