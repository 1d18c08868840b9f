use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Captured phrase, mono.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Utterance {
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
    #[error("no speech detected")]
    NoSpeechDetected,
    #[error("speech recognition service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Waits up to `timeout` for a phrase to start and records at most `phrase_limit` of it.
    /// `None` when nothing was heard or the input failed.
    async fn listen(&self, timeout: Duration, phrase_limit: Duration) -> Option<Utterance>;

    async fn recognize(&self, utterance: &Utterance) -> Result<String, RecognitionError>;
}
