//! Microphone input for the voice front-end.
//!
//! cpal stream -> ring buffer -> 30ms VAD frames -> phrase segmenter ->
//! 16kHz WAV for transcription.

pub mod capture;
pub mod encode;
pub mod listener;
pub mod segmenter;

use thiserror::Error;

pub use capture::MicCapture;
pub use listener::MicListener;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device available")]
    NoDevice,
    #[error("audio device error: {0}")]
    Device(String),
    #[error("unsupported sample rate {0}Hz; VAD requires 8k, 16k, 32k or 48k")]
    UnsupportedRate(u32),
    #[error("resampling failed: {0}")]
    Resample(String),
    #[error("wav encoding failed: {0}")]
    Encode(String),
}
