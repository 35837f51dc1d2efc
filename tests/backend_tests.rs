mod common;

use std::sync::Arc;

use jarvis::config::Config;
use jarvis::kernel::state::{ConversationHistory, Turn, NO_OPERATION};
use jarvis::services::llm::{BackendAdapter, BackendOutcome, OutcomeKind, Role};

use common::ScriptedBackend;

fn adapter(config: &Config) -> BackendAdapter {
    BackendAdapter::new(Arc::new(ScriptedBackend::new()), &config.backend, &config.session)
}

#[test]
fn test_system_instruction_carries_name_and_last_operation() {
    let mut config = Config::default();
    config.session.assistant_name = "Friday".to_string();
    let a = adapter(&config);

    let instruction = a.system_instruction("Hard Command: time, Response: The time is 09:00 AM");
    assert!(instruction.starts_with("You are Friday,"));
    assert!(instruction.contains("with a touch of Friday's dry humor"));
    assert!(instruction.ends_with(
        "The last internal operation was: Hard Command: time, Response: The time is 09:00 AM. "
    ));
}

#[test]
fn test_request_layout() {
    let config = Config::default();
    let a = adapter(&config);

    let mut history = ConversationHistory::new(3);
    history.append(Turn::new(
        "tell me a joke",
        "I would tell you a UDP joke, but you might not get it sir.",
    ));
    history.append(Turn::new("yes", "Indeed sir!"));

    let request = a.build_request("thanks", &history, NO_OPERATION);
    assert_eq!(request.model, "local-model");
    assert_eq!(request.temperature, 0.2);

    let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        [Role::System, Role::User, Role::Assistant, Role::User, Role::Assistant, Role::User]
    );
    assert_eq!(
        request.messages[2].content,
        "I would tell you a UDP joke, but you might not get it"
    );
    assert_eq!(request.messages[4].content, "Indeed");
    assert_eq!(request.messages[5].content, "thanks");
    let system = &request.messages[0].content;
    assert!(system.contains("The last internal operation was: None recorded."));
}

#[test]
fn test_request_serializes_openai_shape() {
    let config = Config::default();
    let a = adapter(&config);
    let request = a.build_request("hello there", &ConversationHistory::new(3), NO_OPERATION);

    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["model"], "local-model");
    assert_eq!(json["messages"][0]["role"], "system");
    assert_eq!(json["messages"][1]["role"], "user");
    assert_eq!(json["messages"][1]["content"], "hello there");
}

#[test]
fn test_outcome_texts() {
    assert_eq!(BackendOutcome::Success(String::new()).kind(), OutcomeKind::Empty);
    assert_eq!(BackendOutcome::Success("Hi.".into()).response_text(), "Hi.");
    assert_eq!(
        BackendOutcome::Timeout.response_text(),
        "Sir, the network operation timed out while waiting for a response from the LLM."
    );
    assert_eq!(
        BackendOutcome::Failure("LLM server error: 500".into()).response_text(),
        "Sir, I seem to have lost connection to the mainframe. Error: LLM server error: 500"
    );
}

#[tokio::test]
async fn test_generate_trims_reply() {
    let config = Config::default();
    let backend = Arc::new(ScriptedBackend::new().reply("  Forty-two.\n"));
    let a = BackendAdapter::new(backend.clone(), &config.backend, &config.session);

    let history = ConversationHistory::new(3);
    let outcome = a.generate("what is the answer", &history, NO_OPERATION).await;
    assert_eq!(outcome, BackendOutcome::Success("Forty-two.".to_string()));
    assert_eq!(backend.request_count(), 1);
}
