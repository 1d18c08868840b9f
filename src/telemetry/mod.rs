//! Dispatch telemetry.
//!
//! # PRIVACY INVARIANT
//! Telemetry events must **NEVER** contain user content (utterances, topics, URLs,
//! transcripts). Only intents, outcome kinds, counts and durations are allowed.
//!
//! # SAFETY INVARIANT
//! Telemetry is a read-only side layer. Nothing in the dispatcher or the voice loop
//! reads it back to make a decision.

pub mod event;
pub mod metrics;
pub mod recorder;

pub use event::{TelemetryEvent, VoiceEventKind};
pub use metrics::TelemetrySnapshot;
pub use recorder::TelemetryRecorder;
