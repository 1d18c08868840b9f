use serde::{Deserialize, Serialize};

use crate::dispatch::{Dispatched, Intent, Outcome};

// Allowed: intents, outcome kinds, durations, counts.
// Forbidden: the utterance, the argument, the response text.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    Dispatch {
        intent: Intent,
        outcome: Outcome,
        latency_ms: u64,
    },

    Voice(VoiceEventKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceEventKind {
    WakeDetected,
    ExitDetected,
    NoAudio,
    NotRecognized,
    ListenFault,
}

impl From<&Dispatched> for TelemetryEvent {
    fn from(d: &Dispatched) -> Self {
        TelemetryEvent::Dispatch {
            intent: d.intent,
            outcome: d.outcome,
            latency_ms: d.elapsed.as_millis() as u64, // Content STRIPPED
        }
    }
}
