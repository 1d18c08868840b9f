mod common;

use common::{dispatcher_with, ScriptedEncyclopedia};
use parley::dispatch::{FailureKind, Intent, Outcome};
use parley::telemetry::{TelemetryEvent, TelemetryRecorder, VoiceEventKind};

#[tokio::test]
async fn test_snapshot_groups_by_intent_and_outcome() {
    let (d, _, _) = dispatcher_with(ScriptedEncyclopedia::new().page("rust", "Rust."));
    let mut recorder = TelemetryRecorder::new();

    for command in ["what time is it", "hey", "wikipedia rust", "wikipedia zzqx", "open a\u{7}b", "", "qwfp"] {
        let dispatched = d.dispatch(command).await;
        recorder.record(TelemetryEvent::from(&dispatched));
    }

    let snapshot = recorder.snapshot();
    let stats = &snapshot.dispatch_stats;
    assert_eq!(stats.total, 7);
    assert_eq!(stats.answered, 3);
    assert_eq!(stats.empty, 1);
    assert_eq!(stats.unmatched, 1);
    assert_eq!(stats.count_of(Intent::EncyclopediaLookup), 2);
    assert_eq!(stats.count_of(Intent::Unknown), 2);
    assert_eq!(stats.failures_of(FailureKind::LookupNotFound), 1);
    assert_eq!(stats.failures_of(FailureKind::NavigationResolutionFault), 1);
    assert!(stats.avg_latency_ms <= stats.max_latency_ms as f64);
}

#[tokio::test]
async fn test_events_carry_no_user_text() {
    let (d, _, _) = dispatcher_with(ScriptedEncyclopedia::new().page("secret topic", "Classified."));

    let dispatched = d.dispatch("search wikipedia for secret topic").await;
    let event = TelemetryEvent::from(&dispatched);
    let json = serde_json::to_string(&event).unwrap();

    assert!(!json.contains("secret"));
    assert!(!json.contains("Classified"));
    assert!(matches!(
        event,
        TelemetryEvent::Dispatch {
            intent: Intent::EncyclopediaLookup,
            outcome: Outcome::Answered,
            ..
        }
    ));
}

#[test]
fn test_recorder_drops_oldest() {
    let mut recorder = TelemetryRecorder::with_capacity(3);
    recorder.record(TelemetryEvent::Voice(VoiceEventKind::WakeDetected));
    for _ in 0..3 {
        recorder.record(TelemetryEvent::Voice(VoiceEventKind::NoAudio));
    }

    assert_eq!(recorder.len(), 3);
    let snapshot = recorder.snapshot();
    assert_eq!(snapshot.voice_stats.wakes, 0);
    assert_eq!(snapshot.voice_stats.missed, 3);

    recorder.clear();
    assert!(recorder.is_empty());
}

#[test]
fn test_snapshot_serializes_for_stats_endpoint() {
    let mut recorder = TelemetryRecorder::new();
    recorder.record(TelemetryEvent::Dispatch {
        intent: Intent::Time,
        outcome: Outcome::Recovered(FailureKind::ClockFault),
        latency_ms: 4,
    });

    let json = serde_json::to_value(recorder.snapshot()).unwrap();
    assert_eq!(json["dispatch_stats"]["by_intent"]["Time"], 1);
    assert_eq!(json["dispatch_stats"]["failures"]["ClockFault"], 1);
    assert_eq!(json["dispatch_stats"]["max_latency_ms"], 4);
}
