#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use parley::dispatch::{Dispatcher, DispatcherBuilder};
use parley::services::{Clock, ClockError, EncyclopediaService, FixedClock, LookupError, NavigationOpener, OpenError};
use parley::speech::{RecognitionError, SpeechSynthesizer, SpeechToText, Utterance};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 2024-03-05 14:07:09, a Tuesday.
pub fn fixed_instant() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 5)
        .and_then(|d| d.and_hms_opt(14, 7, 9))
        .expect("valid instant")
}

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(fixed_instant()))
}

pub struct BrokenClock;

impl Clock for BrokenClock {
    fn now(&self) -> Result<NaiveDateTime, ClockError> {
        Err(ClockError::Unavailable("no time source".into()))
    }
}

/// Answers from fixed tables and records every call.
#[derive(Default)]
pub struct ScriptedEncyclopedia {
    summaries: HashMap<String, Result<String, LookupError>>,
    searches: HashMap<String, Result<Vec<String>, LookupError>>,
    pub delay: Option<Duration>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedEncyclopedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, topic: &str, summary: &str) -> Self {
        self.summaries.insert(topic.to_string(), Ok(summary.to_string()));
        self
    }

    pub fn summary_error(mut self, topic: &str, error: LookupError) -> Self {
        self.summaries.insert(topic.to_string(), Err(error));
        self
    }

    pub fn hits(mut self, topic: &str, titles: &[&str]) -> Self {
        self.searches
            .insert(topic.to_string(), Ok(titles.iter().map(|t| t.to_string()).collect()));
        self
    }

    pub fn search_error(mut self, topic: &str, error: LookupError) -> Self {
        self.searches.insert(topic.to_string(), Err(error));
        self
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EncyclopediaService for ScriptedEncyclopedia {
    async fn summarize(&self, topic: &str, sentences: usize) -> Result<String, LookupError> {
        self.calls.lock().unwrap().push(format!("summary:{topic}:{sentences}"));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.summaries
            .get(topic)
            .cloned()
            .unwrap_or(Err(LookupError::PageNotFound))
    }

    async fn search(&self, topic: &str, limit: usize) -> Result<Vec<String>, LookupError> {
        self.calls.lock().unwrap().push(format!("search:{topic}:{limit}"));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.searches.get(topic).cloned().unwrap_or(Ok(Vec::new()))
    }
}

#[derive(Default)]
pub struct RecordingOpener {
    pub opened: Mutex<Vec<String>>,
}

impl RecordingOpener {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

#[async_trait]
impl NavigationOpener for RecordingOpener {
    async fn open(&self, url: &str) -> Result<(), OpenError> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

pub struct FailingOpener;

#[async_trait]
impl NavigationOpener for FailingOpener {
    async fn open(&self, _url: &str) -> Result<(), OpenError> {
        Err(OpenError::Unsupported)
    }
}

/// Never returns within any sane timeout.
pub struct HangingOpener;

#[async_trait]
impl NavigationOpener for HangingOpener {
    async fn open(&self, _url: &str) -> Result<(), OpenError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }
}

/// What the scripted recognizer does on one listen/recognize round.
#[derive(Debug, Clone)]
pub enum Heard {
    Silence,
    Text(String),
    Garbled,
    Fault(String),
}

impl Heard {
    pub fn text(s: &str) -> Self {
        Heard::Text(s.to_string())
    }
}

/// Plays back a queue of outcomes; an empty queue is silence.
#[derive(Default)]
pub struct ScriptedStt {
    script: Mutex<VecDeque<Heard>>,
    pending: Mutex<Option<Heard>>,
    pub windows: Mutex<Vec<(Duration, Duration)>>,
}

impl ScriptedStt {
    pub fn new(script: Vec<Heard>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Default::default()
        }
    }

    pub fn windows(&self) -> Vec<(Duration, Duration)> {
        self.windows.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechToText for ScriptedStt {
    async fn listen(&self, timeout: Duration, phrase_limit: Duration) -> Option<Utterance> {
        self.windows.lock().unwrap().push((timeout, phrase_limit));
        let next = self.script.lock().unwrap().pop_front().unwrap_or(Heard::Silence);
        if matches!(next, Heard::Silence) {
            return None;
        }
        *self.pending.lock().unwrap() = Some(next);
        Some(Utterance {
            samples: vec![0.0; 160],
            sample_rate: 16_000,
        })
    }

    async fn recognize(&self, _utterance: &Utterance) -> Result<String, RecognitionError> {
        match self.pending.lock().unwrap().take() {
            Some(Heard::Text(text)) => Ok(text),
            Some(Heard::Fault(reason)) => Err(RecognitionError::ServiceUnavailable(reason)),
            _ => Err(RecognitionError::NoSpeechDetected),
        }
    }
}

#[derive(Default)]
pub struct RecordingSynth {
    pub spoken: Mutex<Vec<String>>,
}

impl RecordingSynth {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

impl SpeechSynthesizer for RecordingSynth {
    fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }

    fn stop(&self) {}

    fn is_busy(&self) -> bool {
        false
    }
}

/// Dispatcher over the fixed clock, a recording opener and the given encyclopedia.
pub fn dispatcher_with(encyclopedia: ScriptedEncyclopedia) -> (Dispatcher, Arc<ScriptedEncyclopedia>, Arc<RecordingOpener>) {
    let encyclopedia = Arc::new(encyclopedia);
    let opener = Arc::new(RecordingOpener::default());
    let dispatcher = DispatcherBuilder::default()
        .clock(fixed_clock())
        .encyclopedia(encyclopedia.clone())
        .opener(opener.clone())
        .seed(42)
        .build()
        .expect("standard catalog compiles");
    (dispatcher, encyclopedia, opener)
}

pub fn dispatcher() -> Dispatcher {
    dispatcher_with(ScriptedEncyclopedia::new()).0
}
