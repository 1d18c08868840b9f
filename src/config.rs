//! Assistant configuration, loaded from TOML with environment overrides.
//!
//! Every section is optional; a missing file section falls back to the defaults below.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::dispatch::ShortcutTable;
use crate::services::wikipedia::client::DEFAULT_API_URL;

pub const CONFIG_ENV: &str = "PARLEY_CONFIG";
pub const BIND_ENV: &str = "PARLEY_BIND";
pub const WIKIPEDIA_URL_ENV: &str = "PARLEY_WIKIPEDIA_URL";
pub const WHISPER_URL_ENV: &str = "PARLEY_WHISPER_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    #[serde(default = "default_wake_words")]
    pub wake_words: Vec<String>,

    #[serde(default = "default_exit_words")]
    pub exit_words: Vec<String>,

    #[serde(default)]
    pub speech: SpeechConfig,

    #[serde(default)]
    pub tts: TtsConfig,

    #[serde(default)]
    pub wikipedia: WikipediaConfig,

    #[serde(default)]
    pub navigation: NavigationConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_wake_words() -> Vec<String> {
    ["hello assistant", "hey assistant", "hi assistant", "wake up assistant", "assistant"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_exit_words() -> Vec<String> {
    ["exit", "quit", "goodbye", "stop assistant", "shut down", "turn off"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            wake_words: default_wake_words(),
            exit_words: default_exit_words(),
            speech: SpeechConfig::default(),
            tts: TtsConfig::default(),
            wikipedia: WikipediaConfig::default(),
            navigation: NavigationConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Seconds to wait for the wake phrase to start.
    #[serde(default = "default_wake_timeout")]
    pub wake_timeout_secs: f32,
    #[serde(default = "default_wake_phrase_limit")]
    pub wake_phrase_limit_secs: f32,
    /// Seconds to wait for a command after the wake phrase.
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: f32,
    #[serde(default = "default_command_phrase_limit")]
    pub command_phrase_limit_secs: f32,
    /// whisper.cpp compatible transcription server.
    #[serde(default = "default_whisper_url")]
    pub transcription_url: String,
    #[serde(default = "default_transcription_timeout")]
    pub transcription_timeout_ms: u64,
}

fn default_wake_timeout() -> f32 {
    1.0
}
fn default_wake_phrase_limit() -> f32 {
    3.0
}
fn default_command_timeout() -> f32 {
    5.0
}
fn default_command_phrase_limit() -> f32 {
    5.0
}
fn default_whisper_url() -> String {
    "http://localhost:8081".to_string()
}
fn default_transcription_timeout() -> u64 {
    10_000
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            wake_timeout_secs: default_wake_timeout(),
            wake_phrase_limit_secs: default_wake_phrase_limit(),
            command_timeout_secs: default_command_timeout(),
            command_phrase_limit_secs: default_command_phrase_limit(),
            transcription_url: default_whisper_url(),
            transcription_timeout_ms: default_transcription_timeout(),
        }
    }
}

impl SpeechConfig {
    pub fn wake_window(&self) -> (Duration, Duration) {
        (secs(self.wake_timeout_secs), secs(self.wake_phrase_limit_secs))
    }

    pub fn command_window(&self) -> (Duration, Duration) {
        (secs(self.command_timeout_secs), secs(self.command_phrase_limit_secs))
    }
}

fn secs(value: f32) -> Duration {
    Duration::from_secs_f32(value.max(0.0))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsConfig {
    /// `say` or `espeak`/`espeak-ng`.
    #[serde(default = "default_tts_program")]
    pub program: String,
    /// Words per minute.
    #[serde(default = "default_rate")]
    pub rate: u32,
    /// 0.0 - 1.0
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// Voice name substrings, first match wins.
    #[serde(default = "default_voice_preferences")]
    pub voice_preferences: Vec<String>,
}

fn default_tts_program() -> String {
    if cfg!(target_os = "macos") { "say" } else { "espeak" }.to_string()
}
fn default_rate() -> u32 {
    180
}
fn default_volume() -> f32 {
    0.9
}
fn default_voice_preferences() -> Vec<String> {
    vec!["female".to_string(), "zira".to_string()]
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            program: default_tts_program(),
            rate: default_rate(),
            volume: default_volume(),
            voice_preferences: default_voice_preferences(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikipediaConfig {
    #[serde(default = "default_sentences")]
    pub sentences: usize,
    #[serde(default = "default_search_results")]
    pub search_results: usize,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_lookup_timeout")]
    pub timeout_ms: u64,
}

fn default_sentences() -> usize {
    2
}
fn default_search_results() -> usize {
    3
}
fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_lookup_timeout() -> u64 {
    8_000
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            sentences: default_sentences(),
            search_results: default_search_results(),
            api_url: default_api_url(),
            timeout_ms: default_lookup_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default = "default_open_timeout")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub shortcuts: ShortcutTable,
}

fn default_open_timeout() -> u64 {
    3_000
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_open_timeout(),
            shortcuts: ShortcutTable::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl AssistantConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Explicit path, else `PARLEY_CONFIG`, else defaults; then environment overrides.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(env_path) {
            Some(path) => {
                info!("Loading config from {}", path.display());
                Self::load(&path)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup(BIND_ENV) {
            self.server.bind = bind;
        }
        if let Some(url) = lookup(WIKIPEDIA_URL_ENV) {
            self.wikipedia.api_url = url;
        }
        if let Some(url) = lookup(WHISPER_URL_ENV) {
            self.speech.transcription_url = url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.tts.volume) {
            return Err(ConfigError::Invalid(format!(
                "tts.volume must be within 0.0..=1.0, got {}",
                self.tts.volume
            )));
        }
        if self.wikipedia.sentences == 0 {
            return Err(ConfigError::Invalid("wikipedia.sentences must be at least 1".into()));
        }
        if self.wake_words.iter().any(|w| w.trim().is_empty()) {
            return Err(ConfigError::Invalid("wake_words must not contain blank entries".into()));
        }
        Ok(())
    }
}
