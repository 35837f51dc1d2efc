//! Speech output
//!
//! Replies are spoken fire-and-forget; playback is chained so consecutive
//! replies never overlap. Blocking speech (the farewell) waits for anything
//! in flight and then for itself. Failures are logged and swallowed.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::{SpeechConfig, SpeechMode};
use crate::kernel::formatter::speech_text;
use crate::{Error, Result};

#[async_trait]
pub trait SpeechSink: Send {
    /// Never fails; errors stay inside the sink.
    async fn speak(&mut self, text: &str, blocking: bool);

    /// Wait for any background playback to finish.
    async fn flush(&mut self) {}
}

/// Console-only output.
#[derive(Debug, Default)]
pub struct SilentSpeech;

#[async_trait]
impl SpeechSink for SilentSpeech {
    async fn speak(&mut self, text: &str, _blocking: bool) {
        debug!(chars = text.len(), "speech muted");
    }
}

/// Runs a synthesizer program (`say`, `espeak`) with the text as last argument.
#[derive(Debug)]
pub struct CommandSpeech {
    program: PathBuf,
    args: Vec<String>,
    in_flight: Option<JoinHandle<()>>,
}

pub fn default_program() -> &'static str {
    if cfg!(target_os = "macos") {
        "say"
    } else {
        "espeak"
    }
}

impl CommandSpeech {
    /// # Errors
    ///
    /// Returns `Error::Startup` if `program` is not on `PATH`
    pub fn new(program: &str, args: Vec<String>) -> Result<Self> {
        let program = which::which(program).map_err(|e| {
            Error::Startup(format!("speech synthesizer '{}' unavailable: {}", program, e))
        })?;
        Ok(Self {
            program,
            args,
            in_flight: None,
        })
    }

    fn command(&self, text: &str) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args).arg(speech_text(text)).kill_on_drop(false);
        cmd
    }
}

async fn play(mut cmd: tokio::process::Command) {
    match cmd.spawn() {
        Ok(mut child) => match child.wait().await {
            Ok(status) if !status.success() => {
                warn!(%status, "speech synthesizer exited with failure")
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "speech synthesizer wait failed"),
        },
        Err(e) => warn!(error = %e, "failed to spawn speech synthesizer"),
    }
}

#[async_trait]
impl SpeechSink for CommandSpeech {
    async fn speak(&mut self, text: &str, blocking: bool) {
        let cmd = self.command(text);
        let previous = self.in_flight.take();

        if blocking {
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            play(cmd).await;
            return;
        }

        self.in_flight = Some(tokio::spawn(async move {
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            play(cmd).await;
        }));
    }

    async fn flush(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            let _ = handle.await;
        }
    }
}

/// Sink for `config`; `force_silent` overrides the configured mode.
///
/// # Errors
///
/// Returns `Error::Startup` when the synthesizer cannot be found
pub fn from_config(config: &SpeechConfig, force_silent: bool) -> Result<Box<dyn SpeechSink>> {
    if force_silent || config.mode == SpeechMode::Silent {
        return Ok(Box::new(SilentSpeech));
    }
    let program = config.program.as_deref().unwrap_or_else(|| default_program());
    Ok(Box::new(CommandSpeech::new(program, config.args.clone())?))
}
