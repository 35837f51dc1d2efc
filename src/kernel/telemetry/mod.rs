//! Dispatch telemetry
//!
//! # SAFETY INVARIANT
//! Telemetry is a READ-ONLY side-effect layer.
//! It must never be read inside decision logic (filter, matcher, dispatcher).
//!
//! # PRIVACY INVARIANT
//! Events never carry user content: no utterances, no responses.
//! Intent ids, outcome kinds, counts and durations only.

pub mod event;
pub mod metrics;
pub mod recorder;

pub use event::TelemetryEvent;
pub use metrics::TelemetrySnapshot;
pub use recorder::TelemetryRecorder;
