use hound::{SampleFormat, WavSpec, WavWriter};
use rubato::{FftFixedIn, Resampler};
use std::io::Cursor;

use super::CaptureError;

/// Rate the transcription server expects.
pub const TRANSCRIPTION_RATE: u32 = 16_000;
const CHUNK: usize = 1024;

pub fn resample(samples: &[f32], from: u32, to: u32) -> Result<Vec<f32>, CaptureError> {
    if from == to || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let mut resampler = FftFixedIn::<f32>::new(from as usize, to as usize, CHUNK, 2, 1)
        .map_err(|e| CaptureError::Resample(e.to_string()))?;

    let expected = (samples.len() as u64 * to as u64 / from as u64) as usize;
    let mut out = Vec::with_capacity(expected + CHUNK);

    // The resampler may round its chunk size, so ask it each time.
    let mut pos = 0;
    while samples.len() - pos >= resampler.input_frames_next() {
        let needed = resampler.input_frames_next();
        let frames = resampler
            .process(&[&samples[pos..pos + needed]], None)
            .map_err(|e| CaptureError::Resample(e.to_string()))?;
        out.extend_from_slice(&frames[0]);
        pos += needed;
    }

    let rest = &samples[pos..];
    if !rest.is_empty() {
        let frames = resampler
            .process_partial(Some(&[rest]), None)
            .map_err(|e| CaptureError::Resample(e.to_string()))?;
        out.extend_from_slice(&frames[0]);
    }

    Ok(out)
}

/// 16-bit mono PCM WAV, in memory.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, CaptureError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).map_err(|e| CaptureError::Encode(e.to_string()))?;
        for &sample in samples {
            writer
                .write_sample(to_i16(sample))
                .map_err(|e| CaptureError::Encode(e.to_string()))?;
        }
        writer.finalize().map_err(|e| CaptureError::Encode(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}

pub fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}
