use std::io::Write;

use jarvis::config::{Config, ScorerKind, SpeechMode};
use jarvis::Error;

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.matcher.scorer, ScorerKind::Standard);
    assert_eq!(config.matcher.full_threshold, 85.0);
    assert_eq!(config.matcher.partial_threshold, 98.0);
    assert_eq!(config.matcher.guard_length_ratio, 0.5);
    assert_eq!(config.matcher.guard_full_threshold, 90.0);
    assert_eq!(config.session.history_capacity, 3);
    assert_eq!(config.session.suffix_probability, 0.33);
    assert_eq!(config.backend.base_url, "http://localhost:1234/v1");
    assert_eq!(config.backend.timeout_secs, 15);
    assert_eq!(config.speech.mode, SpeechMode::Command);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_file_keeps_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[matcher]
scorer = "token_sort"

[session]
suffix_probability = 0.0
assistant_name = "Friday"

[speech]
mode = "silent"
"#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.matcher.scorer, ScorerKind::TokenSort);
    assert_eq!(config.matcher.token_sort_threshold, 70.0);
    assert_eq!(config.session.suffix_probability, 0.0);
    assert_eq!(config.session.assistant_name, "Friday");
    assert_eq!(config.session.history_capacity, 3);
    assert_eq!(config.speech.mode, SpeechMode::Silent);
    assert_eq!(config.backend.model, "local-model");
}

#[test]
fn test_out_of_range_values_rejected() {
    for raw in [
        "[session]\nsuffix_probability = 1.5",
        "[session]\nhistory_capacity = 0",
        "[backend]\ntimeout_secs = 0",
        "[matcher]\nfull_threshold = 120.0",
        "[matcher]\nguard_length_ratio = -0.1",
        "[backend]\nbase_url = \"\"",
    ] {
        let result = Config::from_toml_str(raw);
        assert!(matches!(result, Err(Error::Config(_))), "accepted: {}", raw);
    }
}

#[test]
fn test_malformed_and_missing_files() {
    assert!(matches!(Config::from_toml_str("[matcher\n"), Err(Error::Toml(_))));

    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(matches!(Config::load(&missing), Err(Error::Config(_))));
}
