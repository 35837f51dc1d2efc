#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;

use jarvis::kernel::intent::{Catalog, LaunchTarget};
use jarvis::kernel::time::FixedClock;
use jarvis::outputs::SpeechSink;
use jarvis::services::launcher::{LaunchReport, Launcher};
use jarvis::services::llm::{BackendError, ChatRequest, LanguageBackend};
use jarvis::{Config, Dispatcher};

/// Replays scripted replies and keeps every request it saw.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, BackendError>>>,
    pub requests: Mutex<Vec<ChatRequest>>,
    delay: Option<Duration>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.push(Ok(text.to_string()))
    }

    pub fn fail(self, detail: &str) -> Self {
        self.push(Err(BackendError::Other(detail.to_string())))
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn push(self, reply: Result<String, BackendError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LanguageBackend for ScriptedBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<String, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("Noted.".to_string()))
    }
}

/// Records launch targets without spawning anything.
#[derive(Clone, Default)]
pub struct RecordingLauncher {
    pub launched: Arc<Mutex<Vec<LaunchTarget>>>,
    pub fail: bool,
}

impl Launcher for RecordingLauncher {
    fn launch(&self, target: LaunchTarget) -> LaunchReport {
        self.launched.lock().unwrap().push(target);
        LaunchReport {
            name: target.display_name().to_string(),
            launched: !self.fail,
        }
    }
}

/// Captures everything spoken.
#[derive(Clone, Default)]
pub struct RecordingSpeech {
    pub spoken: Arc<Mutex<Vec<(String, bool)>>>,
    pub flushes: Arc<Mutex<usize>>,
}

#[async_trait]
impl SpeechSink for RecordingSpeech {
    async fn speak(&mut self, text: &str, blocking: bool) {
        self.spoken.lock().unwrap().push((text.to_string(), blocking));
    }

    async fn flush(&mut self) {
        *self.flushes.lock().unwrap() += 1;
    }
}

pub fn noon_on_march_fifth() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 5)
        .unwrap()
        .and_hms_opt(14, 7, 0)
        .unwrap()
}

/// Deterministic config: no suffix.
pub fn quiet_config() -> Config {
    let mut config = Config::default();
    config.session.suffix_probability = 0.0;
    config
}

pub fn dispatcher(config: &Config, backend: Arc<ScriptedBackend>) -> Dispatcher {
    Dispatcher::new(config, Catalog::builtin().unwrap(), backend)
        .with_launcher(RecordingLauncher::default())
        .with_clock(FixedClock(noon_on_march_fifth()))
        .with_rng(StdRng::seed_from_u64(7))
}
