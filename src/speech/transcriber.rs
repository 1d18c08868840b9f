use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::recognizer::{RecognitionError, Utterance};
use crate::audio::encode::{encode_wav, resample, TRANSCRIPTION_RATE};

/// Client for a whisper.cpp style `/inference` endpoint.
#[derive(Clone)]
pub struct WhisperClient {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct InferenceResponse {
    #[serde(default)]
    text: String,
}

/// Markers whisper emits instead of words for silence or noise.
const NON_SPEECH: &[&str] = &["[blank_audio]", "(silence)", "[silence]", "[music]", "(music)"];

pub fn clean_transcript(raw: &str) -> Option<String> {
    let text = raw
        .split_whitespace()
        .filter(|word| !NON_SPEECH.contains(&word.to_lowercase().as_str()))
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

impl WhisperClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
        }
    }

    pub async fn transcribe(&self, utterance: &Utterance) -> Result<String, RecognitionError> {
        if utterance.samples.is_empty() {
            return Err(RecognitionError::NoSpeechDetected);
        }

        let samples = resample(&utterance.samples, utterance.sample_rate, TRANSCRIPTION_RATE)
            .map_err(|e| RecognitionError::ServiceUnavailable(e.to_string()))?;
        let wav = encode_wav(&samples, TRANSCRIPTION_RATE)
            .map_err(|e| RecognitionError::ServiceUnavailable(e.to_string()))?;

        let part = Part::bytes(wav)
            .file_name("utterance.wav")
            .mime_str("audio/wav")
            .map_err(|e| RecognitionError::ServiceUnavailable(e.to_string()))?;
        let form = Form::new()
            .part("file", part)
            .text("response_format", "json")
            .text("temperature", "0.0");

        let response = self
            .client
            .post(format!("{}/inference", self.base_url.trim_end_matches('/')))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!("Transcription request failed: {}", e);
                RecognitionError::ServiceUnavailable(e.to_string())
            })?;

        if !response.status().is_success() {
            return Err(RecognitionError::ServiceUnavailable(format!(
                "Transcription server error: {}",
                response.status()
            )));
        }

        let body: InferenceResponse = response
            .json()
            .await
            .map_err(|e| RecognitionError::ServiceUnavailable(e.to_string()))?;

        debug!("Transcribed {:?} of audio", utterance.duration());
        clean_transcript(&body.text).ok_or(RecognitionError::NoSpeechDetected)
    }
}
