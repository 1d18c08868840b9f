use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::AssistantConfig;
use crate::dispatch::Dispatcher;
use crate::speech::recognizer::{RecognitionError, SpeechToText};
use crate::speech::synth::SpeechSynthesizer;
use crate::speech::wake::WakeWords;
use crate::telemetry::{TelemetryEvent, TelemetryRecorder, VoiceEventKind};

pub const STARTUP_PROMPT: &str = "Voice Assistant is ready. Say 'hello assistant' to wake me up.";
pub const WAKE_ACK: &str = "Yes, how can I help you?";
pub const FAREWELL: &str = "Goodbye!";
pub const NOTHING_HEARD: &str = "I didn't hear anything. Try again.";
pub const NOT_CAUGHT: &str = "I didn't catch that. Could you repeat?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenWindow {
    pub timeout: Duration,
    pub phrase_limit: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceTimings {
    pub wake: ListenWindow,
    pub command: ListenWindow,
    /// Pause after a listen fault before trying again.
    pub retry_delay: Duration,
}

impl VoiceTimings {
    pub fn from_config(config: &AssistantConfig) -> Self {
        let (wake_timeout, wake_limit) = config.speech.wake_window();
        let (cmd_timeout, cmd_limit) = config.speech.command_window();
        Self {
            wake: ListenWindow { timeout: wake_timeout, phrase_limit: wake_limit },
            command: ListenWindow { timeout: cmd_timeout, phrase_limit: cmd_limit },
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl Default for VoiceTimings {
    fn default() -> Self {
        Self::from_config(&AssistantConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Wake-word driven voice front-end. Listening runs here; speech runs on the synthesizer's worker.
pub struct VoiceLoop {
    dispatcher: Arc<Dispatcher>,
    stt: Arc<dyn SpeechToText>,
    tts: Arc<dyn SpeechSynthesizer>,
    words: WakeWords,
    timings: VoiceTimings,
    telemetry: Option<Arc<Mutex<TelemetryRecorder>>>,
}

impl VoiceLoop {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        stt: Arc<dyn SpeechToText>,
        tts: Arc<dyn SpeechSynthesizer>,
        words: WakeWords,
        timings: VoiceTimings,
    ) -> Self {
        Self {
            dispatcher,
            stt,
            tts,
            words,
            timings,
            telemetry: None,
        }
    }

    pub fn with_telemetry(mut self, recorder: Arc<Mutex<TelemetryRecorder>>) -> Self {
        self.telemetry = Some(recorder);
        self
    }

    fn record(&self, event: TelemetryEvent) {
        if let Some(recorder) = &self.telemetry {
            recorder
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .record(event);
        }
    }

    pub async fn run(&self, shutdown: CancellationToken) {
        info!("Voice loop started");
        self.tts.speak(STARTUP_PROMPT);

        loop {
            let control = tokio::select! {
                biased;
                _ = shutdown.cancelled() => LoopControl::Stop,
                control = self.step() => control,
            };

            if control == LoopControl::Stop {
                break;
            }
        }

        info!("Voice loop stopped");
    }

    /// Waits for queued speech (the farewell) to finish, up to `limit`.
    pub async fn drain_speech(&self, limit: Duration) {
        let deadline = tokio::time::Instant::now() + limit;
        while self.tts.is_busy() && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    /// One pass of wake-word listening, including any command it triggers.
    pub async fn step(&self) -> LoopControl {
        debug!("Listening for wake word...");
        let window = self.timings.wake;
        let Some(audio) = self.stt.listen(window.timeout, window.phrase_limit).await else {
            return LoopControl::Continue;
        };

        let text = match self.stt.recognize(&audio).await {
            Ok(text) => text,
            Err(RecognitionError::NoSpeechDetected) => return LoopControl::Continue,
            Err(e) => {
                warn!("Error in wake word detection: {}", e);
                self.record(TelemetryEvent::Voice(VoiceEventKind::ListenFault));
                tokio::time::sleep(self.timings.retry_delay).await;
                return LoopControl::Continue;
            }
        };

        debug!("Heard: {}", text);
        let heard = self.words.detect(&text);

        if heard.wake {
            info!("Wake word detected");
            self.record(TelemetryEvent::Voice(VoiceEventKind::WakeDetected));
            self.tts.speak(WAKE_ACK);
            self.handle_command().await;
        }

        if heard.exit {
            info!("Exit word detected");
            self.record(TelemetryEvent::Voice(VoiceEventKind::ExitDetected));
            self.tts.speak(FAREWELL);
            return LoopControl::Stop;
        }

        LoopControl::Continue
    }

    async fn handle_command(&self) {
        debug!("Listening for command...");
        let window = self.timings.command;

        let Some(audio) = self.stt.listen(window.timeout, window.phrase_limit).await else {
            self.record(TelemetryEvent::Voice(VoiceEventKind::NoAudio));
            self.tts.speak(NOTHING_HEARD);
            return;
        };

        match self.stt.recognize(&audio).await {
            Ok(command) => {
                info!("Command received");
                let dispatched = self.dispatcher.dispatch(&command).await;
                self.record(TelemetryEvent::from(&dispatched));
                self.tts.speak(&dispatched.response.text);
            }
            Err(e) => {
                debug!("Command not recognized: {}", e);
                self.record(TelemetryEvent::Voice(VoiceEventKind::NotRecognized));
                self.tts.speak(NOT_CAUGHT);
            }
        }
    }
}
