use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

use super::event::{TelemetryEvent, VoiceEventKind};
use crate::dispatch::{FailureKind, Intent, Outcome};

#[derive(Debug, Clone, Default, Serialize)]
pub struct TelemetrySnapshot {
    pub dispatch_stats: DispatchStats,
    pub voice_stats: VoiceStats,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchStats {
    pub total: u64,
    pub answered: u64,
    pub unmatched: u64,
    pub empty: u64,
    pub by_intent: BTreeMap<Intent, u64>,
    pub failures: BTreeMap<FailureKind, u64>,
    pub avg_latency_ms: f64,
    pub max_latency_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VoiceStats {
    pub wakes: u64,
    pub exits: u64,
    pub missed: u64,
    pub faults: u64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();
    let mut total_latency: u64 = 0;

    for event in events {
        match event {
            TelemetryEvent::Dispatch { intent, outcome, latency_ms } => {
                let stats = &mut snap.dispatch_stats;
                stats.total += 1;
                *stats.by_intent.entry(*intent).or_default() += 1;
                match outcome {
                    Outcome::Answered => stats.answered += 1,
                    Outcome::Unmatched => stats.unmatched += 1,
                    Outcome::EmptyInput => stats.empty += 1,
                    Outcome::Recovered(kind) => *stats.failures.entry(*kind).or_default() += 1,
                }
                total_latency += latency_ms;
                stats.max_latency_ms = stats.max_latency_ms.max(*latency_ms);
            }
            TelemetryEvent::Voice(kind) => match kind {
                VoiceEventKind::WakeDetected => snap.voice_stats.wakes += 1,
                VoiceEventKind::ExitDetected => snap.voice_stats.exits += 1,
                VoiceEventKind::NoAudio | VoiceEventKind::NotRecognized => snap.voice_stats.missed += 1,
                VoiceEventKind::ListenFault => snap.voice_stats.faults += 1,
            },
        }
    }

    if snap.dispatch_stats.total > 0 {
        snap.dispatch_stats.avg_latency_ms = total_latency as f64 / snap.dispatch_stats.total as f64;
    }

    snap
}

impl DispatchStats {
    pub fn failures_of(&self, kind: FailureKind) -> u64 {
        self.failures.get(&kind).copied().unwrap_or(0)
    }

    pub fn count_of(&self, intent: Intent) -> u64 {
        self.by_intent.get(&intent).copied().unwrap_or(0)
    }
}
