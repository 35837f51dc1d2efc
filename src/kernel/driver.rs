//! Session driver
//!
//! Pulls finalized utterances, hands them to the dispatcher and executes the
//! returned side effects. The dispatcher never touches I/O itself.

use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::dispatcher::Dispatcher;
use super::event::SideEffect;
use crate::inputs::UtteranceSource;
use crate::outputs::SpeechSink;
use crate::{Error, Result};

pub const SEPARATOR: &str = "------------------------------";

/// Why a session loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Shutdown intent executed.
    Shutdown,
    /// Utterance source ran dry.
    InputExhausted,
    /// Interrupted from outside (ctrl-c).
    Cancelled,
}

/// Executes effects in order. Returns `true` when a shutdown was requested.
async fn perform(effects: Vec<SideEffect>, assistant: &str, speech: &mut dyn SpeechSink) -> bool {
    let mut shutdown = false;
    for effect in effects {
        match effect {
            SideEffect::Speak { text, blocking } => {
                println!("<< {}: {}", assistant, text);
                speech.speak(&text, blocking).await;
            }
            SideEffect::Shutdown => shutdown = true,
        }
    }
    shutdown
}

/// Runs one session until shutdown, end of input or cancellation.
///
/// # Errors
///
/// Propagates dispatcher errors other than a closed session
pub async fn drive<R>(
    dispatcher: &mut Dispatcher,
    source: &mut UtteranceSource<R>,
    speech: &mut dyn SpeechSink,
    assistant: &str,
    cancel: CancellationToken,
) -> Result<SessionEnd>
where
    R: AsyncRead + Unpin,
{
    let greeting = dispatcher.start();
    perform(greeting, assistant, speech).await;
    println!("Listening...");

    let end = loop {
        let utterance = tokio::select! {
            _ = cancel.cancelled() => break SessionEnd::Cancelled,
            next = source.next_utterance() => match next {
                Some(utterance) => utterance,
                None => break SessionEnd::InputExhausted,
            },
        };

        println!(">> You: {}", utterance);
        let outcome = match dispatcher.handle(&utterance).await {
            Ok(outcome) => outcome,
            Err(Error::SessionClosed) => break SessionEnd::Shutdown,
            Err(e) => {
                error!(error = %e, "dispatch failed");
                return Err(e);
            }
        };

        let shutdown = perform(outcome.effects, assistant, speech).await;
        println!("{}", SEPARATOR);
        if shutdown {
            break SessionEnd::Shutdown;
        }
    };

    speech.flush().await;

    let snapshot = dispatcher.telemetry.snapshot();
    info!(
        end = ?end,
        turns = snapshot.turns_recorded,
        intent_hits = snapshot.routing.intent_hits,
        forced = snapshot.routing.forced_fallbacks,
        backend_calls = snapshot.backend.calls,
        backend_avg_ms = snapshot.backend.avg_latency_ms,
        "session ended"
    );
    Ok(end)
}
