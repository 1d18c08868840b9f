use async_trait::async_trait;
use ringbuf::traits::{Consumer, Observer};
use ringbuf::HeapCons;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use webrtc_vad::{SampleRate, Vad, VadMode};

use super::encode::to_i16;
use super::segmenter::{PhraseSegmenter, SegmentStep, SegmenterConfig, FRAME_MS};
use crate::speech::recognizer::{RecognitionError, SpeechToText, Utterance};
use crate::speech::transcriber::WhisperClient;

fn vad_rate(rate: u32) -> Option<SampleRate> {
    match rate {
        8_000 => Some(SampleRate::Rate8kHz),
        16_000 => Some(SampleRate::Rate16kHz),
        32_000 => Some(SampleRate::Rate32kHz),
        48_000 => Some(SampleRate::Rate48kHz),
        _ => None,
    }
}

/// Microphone speech input: VAD-cut phrases from the capture ring buffer,
/// transcribed by a whisper server.
pub struct MicListener {
    consumer: Arc<Mutex<HeapCons<f32>>>,
    sample_rate: u32,
    transcriber: WhisperClient,
}

impl MicListener {
    pub fn new(consumer: HeapCons<f32>, sample_rate: u32, transcriber: WhisperClient) -> Self {
        Self {
            consumer: Arc::new(Mutex::new(consumer)),
            sample_rate,
            transcriber,
        }
    }
}

fn capture_phrase(
    consumer: &Mutex<HeapCons<f32>>,
    sample_rate: u32,
    config: SegmenterConfig,
    deadline: Instant,
) -> Option<Vec<f32>> {
    let Some(rate) = vad_rate(sample_rate) else {
        warn!("Unsupported VAD rate {}", sample_rate);
        return None;
    };

    // Vad is not Send, so it lives only on this blocking thread
    let mut vad = Vad::new_with_rate_and_mode(rate, VadMode::Aggressive);
    let frame_size = (sample_rate * FRAME_MS / 1000) as usize;
    let mut frame = vec![0.0f32; frame_size];
    let mut pcm = vec![0i16; frame_size];
    let mut segmenter = PhraseSegmenter::new(config);

    let mut consumer = consumer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    // Anything buffered before this call belongs to an earlier phrase
    let stale = consumer.occupied_len();
    consumer.skip(stale);

    loop {
        if Instant::now() >= deadline {
            debug!("Listen deadline passed");
            return None;
        }

        // 1. Read Frame
        if consumer.occupied_len() < frame_size {
            std::thread::sleep(Duration::from_millis(10));
            continue;
        }
        consumer.pop_slice(&mut frame);

        // 2. Convert f32 -> i16
        for (dst, &src) in pcm.iter_mut().zip(frame.iter()) {
            *dst = to_i16(src);
        }

        // 3. VAD
        let is_speech = vad.is_voice_segment(&pcm).unwrap_or_else(|_| {
            debug!("VAD rejected frame of {} samples", frame_size);
            false
        });

        // 4. Segment
        match segmenter.push(&frame, is_speech) {
            SegmentStep::Pending => {}
            SegmentStep::TimedOut => return None,
            SegmentStep::Complete(samples) => return Some(samples),
        }
    }
}

#[async_trait]
impl SpeechToText for MicListener {
    async fn listen(&self, timeout: Duration, phrase_limit: Duration) -> Option<Utterance> {
        let config = SegmenterConfig::for_window(timeout.as_millis() as u64, phrase_limit.as_millis() as u64);
        let deadline = Instant::now() + timeout + phrase_limit + Duration::from_secs(1);
        let consumer = self.consumer.clone();
        let sample_rate = self.sample_rate;

        let samples = tokio::task::spawn_blocking(move || capture_phrase(&consumer, sample_rate, config, deadline))
            .await
            .unwrap_or_else(|e| {
                warn!("Listen task failed: {}", e);
                None
            })?;

        let utterance = Utterance { samples, sample_rate };
        info!("Captured phrase of {:?}", utterance.duration());
        Some(utterance)
    }

    async fn recognize(&self, utterance: &Utterance) -> Result<String, RecognitionError> {
        self.transcriber.transcribe(utterance).await
    }
}
