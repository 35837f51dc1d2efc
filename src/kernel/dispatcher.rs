use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use super::event::{Route, SideEffect};
use super::formatter::{self, SuffixPolicy};
use super::intent::{
    Action, Catalog, ForcedFallbackFilter, FuzzyMatcher, Intent, IntentKind, Response,
};
use super::presence::{DispatchGraph, DispatchRequest, DispatchState};
use super::state::{SessionState, StateDelta, Turn};
use super::telemetry::{TelemetryEvent, TelemetryRecorder};
use super::time::{Clock, SystemClock};
use crate::config::Config;
use crate::services::launcher::{Launcher, SystemLauncher};
use crate::services::llm::{BackendAdapter, BackendOutcome, LanguageBackend};
use crate::{Error, Result};

pub const GREETINGS: [&str; 4] = [
    "Systems online, sir.",
    "Mini Jarvis online and operational.",
    "Greetings. How may I be of assistance?",
    "Online. Proceed with your query.",
];

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub route: Route,
    /// Final text after formatting (the farewell for shutdown, empty when ignored).
    pub response: String,
    pub effects: Vec<SideEffect>,
}

/// Per-utterance decision engine and sole owner of the session state.
///
/// Forced-fallback filter, then fuzzy matcher, then either the intent action or
/// the language backend. Output is returned as `SideEffect`s for the driver.
pub struct Dispatcher {
    catalog: Catalog,
    matcher: FuzzyMatcher,
    fallback: ForcedFallbackFilter,
    backend: BackendAdapter,
    launcher: Box<dyn Launcher>,
    clock: Box<dyn Clock>,
    rng: StdRng,
    suffix: SuffixPolicy,
    state: DispatchState,
    pub session: SessionState,
    pub telemetry: TelemetryRecorder,
}

impl Dispatcher {
    pub fn new(config: &Config, catalog: Catalog, backend: Arc<dyn LanguageBackend>) -> Self {
        Self {
            catalog,
            matcher: FuzzyMatcher::from_config(&config.matcher),
            fallback: ForcedFallbackFilter::from_config(&config.matcher),
            backend: BackendAdapter::new(backend, &config.backend, &config.session),
            launcher: Box::new(SystemLauncher::default()),
            clock: Box::new(SystemClock),
            rng: StdRng::from_entropy(),
            suffix: SuffixPolicy::new(config.session.suffix_probability),
            state: DispatchState::Idle,
            session: SessionState::new(config.session.history_capacity),
            telemetry: TelemetryRecorder::new(),
        }
    }

    pub fn with_launcher(mut self, launcher: impl Launcher + 'static) -> Self {
        self.launcher = Box::new(launcher);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_backend_adapter(mut self, adapter: BackendAdapter) -> Self {
        self.backend = adapter;
        self
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn advance(&mut self, request: DispatchRequest) {
        match DispatchGraph::transition(self.state, request) {
            Some(next) => {
                debug!(from = ?self.state, to = ?next, "dispatch transition");
                self.state = next;
            }
            None => warn!(
                state = ?self.state,
                request = ?request,
                "ignored illegal dispatch transition"
            ),
        }
    }

    /// Idle -> Listening, with a random greeting. No-op after the first call.
    pub fn start(&mut self) -> Vec<SideEffect> {
        if self.state != DispatchState::Idle {
            return Vec::new();
        }
        self.advance(DispatchRequest::SessionStart);
        info!(session = %self.session.id, "dispatch session started");

        let greeting = GREETINGS.choose(&mut self.rng).copied().unwrap_or(GREETINGS[0]);
        vec![SideEffect::Speak {
            text: greeting.to_string(),
            blocking: false,
        }]
    }

    /// Runs one utterance through the full state-machine pass.
    ///
    /// # Errors
    ///
    /// Returns `Error::SessionClosed` once the shutdown intent has executed
    pub async fn handle(&mut self, utterance: &str) -> Result<DispatchOutcome> {
        if self.state.is_terminal() {
            return Err(Error::SessionClosed);
        }
        if self.state == DispatchState::Idle {
            self.advance(DispatchRequest::SessionStart);
        }

        let text = utterance.trim().to_lowercase();
        if text.is_empty() {
            return Ok(DispatchOutcome {
                route: Route::Ignored,
                response: String::new(),
                effects: Vec::new(),
            });
        }

        self.advance(DispatchRequest::UtteranceFinalized);
        // Drawn before classification so it stays independent of the route
        let add_suffix = self.suffix.draw(&mut self.rng);

        let forced = self.fallback.should_force_llm(&text);
        let matched = if forced {
            self.telemetry.record(TelemetryEvent::ForcedFallback);
            None
        } else {
            self.telemetry.record(TelemetryEvent::MatcherConsulted);
            self.matcher.find(&text, &self.catalog)
        };
        self.advance(DispatchRequest::Classified);

        let (route, response) = match matched {
            Some(m) => {
                let Some(intent) = self.catalog.get(&m.intent_id) else {
                    // Matcher only returns ids from this catalog
                    return Err(Error::Catalog(format!("matched unknown intent '{}'", m.intent_id)));
                };
                info!(intent = %m.intent_id, score = m.score, kind = ?m.kind, "intent matched");
                self.telemetry.record(TelemetryEvent::IntentMatched {
                    intent_id: m.intent_id.clone(),
                    kind: m.kind,
                });

                let kind = intent.kind();
                let raw = resolve_response(
                    intent,
                    &mut self.rng,
                    self.launcher.as_ref(),
                    self.clock.as_ref(),
                    &mut self.telemetry,
                );

                if kind == IntentKind::Shutdown {
                    return Ok(self.shut_down(raw));
                }

                let response = formatter::format(&raw, add_suffix);
                self.session.reduce(StateDelta::OperationRecorded(format!(
                    "Hard Command: {}, Response: {}",
                    text, response
                )));
                (Route::Intent(m), response)
            }
            None => {
                info!(forced, "consulting language backend");
                let started = Instant::now();
                let outcome = self
                    .backend
                    .generate(&text, self.session.history(), self.session.last_operation())
                    .await;
                self.telemetry.record(TelemetryEvent::BackendCall {
                    outcome: outcome.kind(),
                    latency_ms: started.elapsed().as_millis() as u64,
                });

                if let BackendOutcome::Success(reply) = &outcome {
                    self.session.reduce(StateDelta::OperationRecorded(format!(
                        "LLM Query: {}, LLM Response: {}",
                        text, reply
                    )));
                }

                let response = formatter::format(&outcome.response_text(), add_suffix);
                let route = if forced {
                    Route::ForcedFallback(outcome.kind())
                } else {
                    Route::Backend(outcome.kind())
                };
                (route, response)
            }
        };

        self.advance(DispatchRequest::ResponseReady);
        if add_suffix {
            self.telemetry.record(TelemetryEvent::SuffixApplied);
        }

        self.session
            .reduce(StateDelta::TurnCompleted(Turn::new(text, response.clone())));
        self.telemetry.record(TelemetryEvent::TurnRecorded {
            history_len: self.session.history().len(),
        });
        self.advance(DispatchRequest::TurnRecorded);

        Ok(DispatchOutcome {
            route,
            effects: vec![SideEffect::Speak {
                text: response.clone(),
                blocking: false,
            }],
            response,
        })
    }

    /// Terminal path: no formatting, no history update, farewell heard to completion.
    fn shut_down(&mut self, farewell: String) -> DispatchOutcome {
        self.advance(DispatchRequest::ShutdownMatched);
        self.telemetry.record(TelemetryEvent::Shutdown);
        info!(
            session = %self.session.id,
            turns = self.session.history().len(),
            "shutdown intent executed"
        );

        DispatchOutcome {
            route: Route::Shutdown,
            effects: vec![
                SideEffect::Speak {
                    text: farewell.clone(),
                    blocking: true,
                },
                SideEffect::Shutdown,
            ],
            response: farewell,
        }
    }
}

/// Picks one response at random and evaluates it. Computed responses run
/// their side effect synchronously.
fn resolve_response(
    intent: &Intent,
    rng: &mut StdRng,
    launcher: &dyn Launcher,
    clock: &dyn Clock,
    telemetry: &mut TelemetryRecorder,
) -> String {
    let Some(response) = intent.responses().choose(rng) else {
        return String::new();
    };

    match response {
        Response::Literal(text) => text.clone(),
        Response::Computed(Action::ClockReading { template, format }) => {
            let reading = clock.now().format(format).to_string();
            template.replace("{}", &reading)
        }
        Response::Computed(Action::Launch(target)) => {
            let report = launcher.launch(*target);
            telemetry.record(TelemetryEvent::LaunchAttempt {
                launched: report.launched,
            });
            report.message()
        }
    }
}
