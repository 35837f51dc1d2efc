use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;

use super::event::TelemetryEvent;
use crate::services::llm::OutcomeKind;

#[derive(Debug, Clone, Default, Serialize)]
pub struct TelemetrySnapshot {
    pub routing: RoutingStats,
    pub backend: BackendStats,
    pub turns_recorded: u64,
    pub suffixes_applied: u64,
    pub launches: u64,
    pub failed_launches: u64,
    pub shutdown: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RoutingStats {
    pub forced_fallbacks: u64,
    pub matcher_consultations: u64,
    pub intent_hits: u64,
    /// Keyed by intent id; ordered for stable output.
    pub hits_by_intent: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BackendStats {
    pub calls: u64,
    pub successes: u64,
    pub empty: u64,
    pub timeouts: u64,
    pub failures: u64,
    pub total_latency_ms: u64,
    pub avg_latency_ms: f64,
    pub max_latency_ms: u64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            TelemetryEvent::ForcedFallback => snap.routing.forced_fallbacks += 1,
            TelemetryEvent::MatcherConsulted => snap.routing.matcher_consultations += 1,
            TelemetryEvent::IntentMatched { intent_id, .. } => {
                snap.routing.intent_hits += 1;
                *snap.routing.hits_by_intent.entry(intent_id.clone()).or_insert(0) += 1;
            }
            TelemetryEvent::BackendCall { outcome, latency_ms } => {
                let b = &mut snap.backend;
                b.calls += 1;
                b.total_latency_ms += latency_ms;
                b.max_latency_ms = b.max_latency_ms.max(*latency_ms);
                match outcome {
                    OutcomeKind::Success => b.successes += 1,
                    OutcomeKind::Empty => b.empty += 1,
                    OutcomeKind::Timeout => b.timeouts += 1,
                    OutcomeKind::Failure => b.failures += 1,
                }
            }
            TelemetryEvent::LaunchAttempt { launched } => {
                snap.launches += 1;
                if !launched {
                    snap.failed_launches += 1;
                }
            }
            TelemetryEvent::SuffixApplied => snap.suffixes_applied += 1,
            TelemetryEvent::TurnRecorded { .. } => snap.turns_recorded += 1,
            TelemetryEvent::Shutdown => snap.shutdown = true,
        }
    }

    if snap.backend.calls > 0 {
        let b = &mut snap.backend;
        b.avg_latency_ms = b.total_latency_ms as f64 / b.calls as f64;
    }

    snap
}
