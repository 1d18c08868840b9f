use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::traits::Producer;
use tracing::{error, info};

use super::CaptureError;

/// Rates webrtc VAD accepts, most efficient first.
pub const VAD_RATES: [u32; 4] = [16_000, 32_000, 48_000, 8_000];

/// Picks the first VAD rate any supported (min, max) range covers.
pub fn pick_rate(ranges: &[(u32, u32)]) -> Option<u32> {
    VAD_RATES
        .iter()
        .copied()
        .find(|&rate| ranges.iter().any(|&(min, max)| min <= rate && rate <= max))
}

/// Live microphone stream feeding mono samples into a ring buffer.
/// Dropping it stops capture.
pub struct MicCapture {
    _stream: cpal::Stream,
    pub sample_rate: u32,
    pub channels: u16,
}

impl MicCapture {
    pub fn open<P>(mut producer: P) -> Result<Self, CaptureError>
    where
        P: Producer<Item = f32> + Send + 'static,
    {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;

        info!("Audio input device: {}", device.name().unwrap_or_default());

        let ranges: Vec<cpal::SupportedStreamConfigRange> = device
            .supported_input_configs()
            .map_err(|e| CaptureError::Device(e.to_string()))?
            .collect();
        let bounds: Vec<(u32, u32)> = ranges
            .iter()
            .map(|r| (r.min_sample_rate().0, r.max_sample_rate().0))
            .collect();

        let config = match pick_rate(&bounds) {
            Some(rate) => ranges
                .into_iter()
                .find(|r| r.min_sample_rate().0 <= rate && rate <= r.max_sample_rate().0)
                .map(|r| r.with_sample_rate(cpal::SampleRate(rate)))
                .ok_or(CaptureError::UnsupportedRate(rate))?,
            None => {
                let fallback = device
                    .default_input_config()
                    .map_err(|e| CaptureError::Device(e.to_string()))?;
                let rate = fallback.sample_rate().0;
                if !VAD_RATES.contains(&rate) {
                    return Err(CaptureError::UnsupportedRate(rate));
                }
                fallback
            }
        };

        let sample_rate = config.sample_rate().0;
        let channels = config.channels();
        info!("Audio config selected: rate={}Hz, channels={}", sample_rate, channels);

        let err_fn = |err| error!("Audio stream error: {}", err);
        let stream_config: cpal::StreamConfig = config.config();
        let width = channels.max(1) as usize;

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => device.build_input_stream(
                &stream_config,
                move |data: &[f32], _: &_| push_mono(data.iter().copied(), width, &mut producer),
                err_fn,
                None,
            ),
            cpal::SampleFormat::I16 => device.build_input_stream(
                &stream_config,
                move |data: &[i16], _: &_| {
                    push_mono(data.iter().map(|&s| s as f32 / i16::MAX as f32), width, &mut producer)
                },
                err_fn,
                None,
            ),
            other => return Err(CaptureError::Device(format!("unsupported sample format {other:?}"))),
        }
        .map_err(|e| CaptureError::Device(e.to_string()))?;

        stream.play().map_err(|e| CaptureError::Device(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            sample_rate,
            channels,
        })
    }
}

/// Averages interleaved channels down to mono. Lossy when the buffer is full.
fn push_mono<I, P>(samples: I, channels: usize, producer: &mut P)
where
    I: Iterator<Item = f32>,
    P: Producer<Item = f32>,
{
    let mut acc = 0.0;
    let mut n = 0;
    for sample in samples {
        acc += sample;
        n += 1;
        if n == channels {
            let _ = producer.try_push(acc / channels as f32);
            acc = 0.0;
            n = 0;
        }
    }
}
