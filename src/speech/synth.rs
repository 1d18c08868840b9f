use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::{mpsc, Notify};
use tracing::{debug, info, warn};

use crate::config::TtsConfig;

/// Fire-and-forget speech output.
pub trait SpeechSynthesizer: Send + Sync {
    /// Queues `text` and returns immediately. Blank text is ignored.
    fn speak(&self, text: &str);

    /// Cuts off the current phrase and drops anything queued.
    fn stop(&self);

    /// True while anything is queued or playing.
    fn is_busy(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthProgram {
    /// macOS `say`
    Say,
    /// `espeak` / `espeak-ng`
    Espeak,
}

impl SynthProgram {
    pub fn detect(program: &str) -> Self {
        if program.contains("espeak") {
            SynthProgram::Espeak
        } else {
            SynthProgram::Say
        }
    }

    pub fn args(&self, text: &str, rate: u32, volume: f32, voice: Option<&str>) -> Vec<String> {
        let mut args = Vec::new();
        match self {
            SynthProgram::Say => {
                args.push("-r".to_string());
                args.push(rate.to_string());
                if let Some(v) = voice {
                    args.push("-v".to_string());
                    args.push(v.to_string());
                }
                // say has no volume flag; the embedded command sets it per utterance
                args.push(format!("[[volm {:.2}]] {}", volume, text));
            }
            SynthProgram::Espeak => {
                args.push("-s".to_string());
                args.push(rate.to_string());
                args.push("-a".to_string());
                args.push(((volume.clamp(0.0, 1.0) * 200.0).round() as u32).to_string());
                if let Some(v) = voice {
                    args.push("-v".to_string());
                    args.push(v.to_string());
                }
                args.push(text.to_string());
            }
        }
        args
    }

    pub fn list_voices_args(&self) -> &'static [&'static str] {
        match self {
            SynthProgram::Say => &["-v", "?"],
            SynthProgram::Espeak => &["--voices"],
        }
    }

    pub fn parse_voices(&self, listing: &str) -> Vec<String> {
        match self {
            // "Samantha            en_US    # Hello, my name is Samantha."
            SynthProgram::Say => listing
                .lines()
                .filter_map(|line| {
                    let head = line.split('#').next()?.trim_end();
                    let mut cols: Vec<&str> = head.split_whitespace().collect();
                    // the last column is the locale
                    cols.pop()?;
                    (!cols.is_empty()).then(|| cols.join(" "))
                })
                .collect(),
            // "Pty Language       Age/Gender VoiceName          File"
            SynthProgram::Espeak => listing
                .lines()
                .skip(1)
                .filter_map(|line| line.split_whitespace().nth(3).map(str::to_string))
                .collect(),
        }
    }
}

/// First voice whose name contains any preference (case-insensitive), else the first voice.
pub fn choose_voice(available: &[String], preferences: &[String]) -> Option<String> {
    let prefs: Vec<String> = preferences.iter().map(|p| p.to_lowercase()).collect();
    available
        .iter()
        .find(|voice| {
            let name = voice.to_lowercase();
            prefs.iter().any(|p| !p.is_empty() && name.contains(p.as_str()))
        })
        .or_else(|| available.first())
        .cloned()
}

struct Job {
    text: String,
    generation: u64,
}

struct SynthShared {
    /// Queued plus in-flight jobs.
    pending: AtomicUsize,
    generation: AtomicU64,
    interrupt: Notify,
}

/// Speaks through an external TTS process on a background worker task.
pub struct ProcessSynthesizer {
    queue: mpsc::UnboundedSender<Job>,
    shared: Arc<SynthShared>,
}

#[derive(Debug, Clone)]
struct Voice {
    program: String,
    kind: SynthProgram,
    rate: u32,
    volume: f32,
    voice: Option<String>,
}

impl ProcessSynthesizer {
    /// Must be called inside a Tokio runtime; the worker lives until the synthesizer is dropped.
    pub async fn spawn(config: &TtsConfig) -> Self {
        let kind = SynthProgram::detect(&config.program);
        let voices = list_voices(&config.program, kind).await;
        let voice = choose_voice(&voices, &config.voice_preferences);
        match &voice {
            Some(v) => info!("TTS voice configured: {}", v),
            None => info!("TTS using default voice"),
        }

        let settings = Voice {
            program: config.program.clone(),
            kind,
            rate: config.rate,
            volume: config.volume,
            voice,
        };

        let shared = Arc::new(SynthShared {
            pending: AtomicUsize::new(0),
            generation: AtomicU64::new(0),
            interrupt: Notify::new(),
        });

        let (queue, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(rx, shared.clone(), settings));

        Self { queue, shared }
    }
}

async fn list_voices(program: &str, kind: SynthProgram) -> Vec<String> {
    match Command::new(program).args(kind.list_voices_args()).output().await {
        Ok(out) if out.status.success() => kind.parse_voices(&String::from_utf8_lossy(&out.stdout)),
        Ok(out) => {
            debug!("Voice listing exited with {}", out.status);
            Vec::new()
        }
        Err(e) => {
            warn!("Failed to list voices with '{}': {}", program, e);
            Vec::new()
        }
    }
}

async fn run_worker(mut rx: mpsc::UnboundedReceiver<Job>, shared: Arc<SynthShared>, voice: Voice) {
    while let Some(job) = rx.recv().await {
        if job.generation != shared.generation.load(Ordering::SeqCst) {
            shared.pending.fetch_sub(1, Ordering::SeqCst);
            continue; // Stopped while queued
        }

        debug!("Speaking: {}", job.text);

        let args = voice.kind.args(&job.text, voice.rate, voice.volume, voice.voice.as_deref());
        match Command::new(&voice.program).args(&args).kill_on_drop(true).spawn() {
            Ok(mut child) => {
                tokio::select! {
                    status = child.wait() => {
                        if let Err(e) = status {
                            warn!("TTS process failed: {}", e);
                        }
                    }
                    _ = shared.interrupt.notified() => {
                        let _ = child.kill().await;
                    }
                }
            }
            Err(e) => warn!("Failed to spawn '{}': {}", voice.program, e),
        }

        shared.pending.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SpeechSynthesizer for ProcessSynthesizer {
    fn speak(&self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        let job = Job {
            text: text.to_string(),
            generation: self.shared.generation.load(Ordering::SeqCst),
        };
        self.shared.pending.fetch_add(1, Ordering::SeqCst);
        if self.queue.send(job).is_err() {
            self.shared.pending.fetch_sub(1, Ordering::SeqCst);
            warn!("TTS worker is gone, dropping speech");
        }
    }

    fn stop(&self) {
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        self.shared.interrupt.notify_waiters();
    }

    fn is_busy(&self) -> bool {
        self.shared.pending.load(Ordering::SeqCst) > 0
    }
}
