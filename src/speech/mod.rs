pub mod recognizer;
pub mod synth;
pub mod transcriber;
pub mod wake;

pub use recognizer::{RecognitionError, SpeechToText, Utterance};
pub use synth::{ProcessSynthesizer, SpeechSynthesizer, SynthProgram};
pub use transcriber::WhisperClient;
pub use wake::{Heard, WakeWords};
