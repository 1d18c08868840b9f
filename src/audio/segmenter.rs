use std::collections::VecDeque;

/// 30ms frames, the VAD's preferred size.
pub const FRAME_MS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmenterConfig {
    /// 90ms to trigger start
    pub min_speech_frames: usize,
    /// 600ms to trigger end
    pub min_silence_frames: usize,
    /// Frames to wait for speech before giving up.
    pub max_wait_frames: usize,
    /// Hard cap on phrase length.
    pub max_phrase_frames: usize,
}

impl SegmenterConfig {
    pub fn for_window(timeout_ms: u64, phrase_limit_ms: u64) -> Self {
        let frames = |ms: u64| ((ms + FRAME_MS as u64 - 1) / FRAME_MS as u64).max(1) as usize;
        Self {
            min_speech_frames: 3,
            min_silence_frames: 20,
            max_wait_frames: frames(timeout_ms),
            max_phrase_frames: frames(phrase_limit_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SegmentStep {
    Pending,
    Complete(Vec<f32>),
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Waiting,
    Recording,
}

/// Debounced VAD state machine that cuts one phrase out of a frame stream.
#[derive(Debug)]
pub struct PhraseSegmenter {
    config: SegmenterConfig,
    phase: Phase,
    consecutive_speech: usize,
    consecutive_silence: usize,
    waited: usize,
    recorded_frames: usize,
    pre_roll: VecDeque<Vec<f32>>,
    recorded: Vec<f32>,
}

impl PhraseSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self {
            config,
            phase: Phase::Waiting,
            consecutive_speech: 0,
            consecutive_silence: 0,
            waited: 0,
            recorded_frames: 0,
            pre_roll: VecDeque::with_capacity(config.min_speech_frames),
            recorded: Vec::new(),
        }
    }

    pub fn is_recording(&self) -> bool {
        self.phase == Phase::Recording
    }

    pub fn push(&mut self, frame: &[f32], is_speech: bool) -> SegmentStep {
        if is_speech {
            self.consecutive_silence = 0;
            self.consecutive_speech += 1;
        } else {
            self.consecutive_speech = 0;
            self.consecutive_silence += 1;
        }

        match self.phase {
            Phase::Waiting => {
                // Keep the frames that confirmed speech so the phrase onset is not clipped
                if self.pre_roll.len() == self.config.min_speech_frames {
                    self.pre_roll.pop_front();
                }
                self.pre_roll.push_back(frame.to_vec());

                if self.consecutive_speech >= self.config.min_speech_frames {
                    self.phase = Phase::Recording;
                    for held in self.pre_roll.drain(..) {
                        self.recorded.extend_from_slice(&held);
                        self.recorded_frames += 1;
                    }
                    return self.check_limit();
                }

                self.waited += 1;
                if self.waited >= self.config.max_wait_frames {
                    return SegmentStep::TimedOut;
                }
                SegmentStep::Pending
            }
            Phase::Recording => {
                self.recorded.extend_from_slice(frame);
                self.recorded_frames += 1;

                if self.consecutive_silence >= self.config.min_silence_frames {
                    return SegmentStep::Complete(std::mem::take(&mut self.recorded));
                }
                self.check_limit()
            }
        }
    }

    fn check_limit(&mut self) -> SegmentStep {
        if self.recorded_frames >= self.config.max_phrase_frames {
            SegmentStep::Complete(std::mem::take(&mut self.recorded))
        } else {
            SegmentStep::Pending
        }
    }
}
