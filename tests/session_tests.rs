mod common;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use jarvis::inputs::{PayloadFormat, UtteranceSource};
use jarvis::kernel::dispatcher::GREETINGS;
use jarvis::kernel::intent::FAREWELL;
use jarvis::kernel::{drive, SessionEnd};

use common::{dispatcher, quiet_config, RecordingSpeech, ScriptedBackend};

#[tokio::test]
async fn test_session_runs_until_shutdown() {
    let input: &[u8] = b"what time is it\n\nshut down\nwho painted the mona lisa\n";
    let mut source = UtteranceSource::new(input, PayloadFormat::Text);
    let backend = Arc::new(ScriptedBackend::new());
    let mut d = dispatcher(&quiet_config(), backend.clone());
    let mut speech = RecordingSpeech::default();
    let spoken = speech.spoken.clone();

    let end = drive(&mut d, &mut source, &mut speech, "Jarvis", CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(end, SessionEnd::Shutdown);
    let spoken = spoken.lock().unwrap();
    assert_eq!(spoken.len(), 3, "greeting, time, farewell");
    assert!(GREETINGS.contains(&spoken[0].0.as_str()));
    assert!(spoken[1].0.contains("02:07 PM"));
    assert!(!spoken[1].1);
    assert_eq!(spoken[2], (FAREWELL.to_string(), true));
    assert_eq!(backend.request_count(), 0, "nothing read after shutdown");
}

#[tokio::test]
async fn test_session_ends_with_input() {
    let input: &[u8] = br#"{"text": "who painted the mona lisa"}
{"partial": "who"}
not json at all
{"text": ""}
"#;
    let mut source = UtteranceSource::new(input, PayloadFormat::Json);
    let backend = Arc::new(ScriptedBackend::new().reply("Leonardo da Vinci."));
    let mut d = dispatcher(&quiet_config(), backend.clone());
    let mut speech = RecordingSpeech::default();
    let flushes = speech.flushes.clone();

    let end = drive(&mut d, &mut source, &mut speech, "Jarvis", CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(end, SessionEnd::InputExhausted);
    assert_eq!(backend.request_count(), 1);
    assert_eq!(d.session.history().len(), 1);
    assert_eq!(*flushes.lock().unwrap(), 1, "speech drained before returning");
}

#[tokio::test]
async fn test_cancelled_session_stops_listening() {
    let (_writer, reader) = tokio::io::duplex(64);
    let mut source = UtteranceSource::new(reader, PayloadFormat::Text);
    let mut d = dispatcher(&quiet_config(), Arc::new(ScriptedBackend::new()));
    let mut speech = RecordingSpeech::default();

    let cancel = CancellationToken::new();
    cancel.cancel();

    let end = drive(&mut d, &mut source, &mut speech, "Jarvis", cancel).await.unwrap();
    assert_eq!(end, SessionEnd::Cancelled);
    assert!(d.session.history().is_empty());
}

#[tokio::test]
async fn test_oversized_lines_are_skipped() {
    let mut input = "a".repeat(5000);
    input.push_str("\nhello\n");
    let mut source = UtteranceSource::new(input.as_bytes(), PayloadFormat::Text);

    assert_eq!(source.next_utterance().await, Some("hello".to_string()));
    assert_eq!(source.next_utterance().await, None);
}

#[tokio::test]
async fn test_non_utf8_lines_are_skipped() {
    let input: &[u8] = b"hello\n\xff\xfe garbage\nwhat time is it\n";
    let mut source = UtteranceSource::new(input, PayloadFormat::Text);

    assert_eq!(source.next_utterance().await, Some("hello".to_string()));
    assert_eq!(source.next_utterance().await, Some("what time is it".to_string()));
    assert_eq!(source.next_utterance().await, None);
}

#[tokio::test]
async fn test_session_survives_non_utf8_line() {
    let input: &[u8] = b"\xc3\x28 noise\nshut down\n";
    let mut source = UtteranceSource::new(input, PayloadFormat::Text);
    let mut d = dispatcher(&quiet_config(), Arc::new(ScriptedBackend::new()));
    let mut speech = RecordingSpeech::default();

    let end = drive(&mut d, &mut source, &mut speech, "Jarvis", CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(end, SessionEnd::Shutdown);
}
