use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classified purpose of an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Intent {
    Time,
    Date,
    EncyclopediaLookup,
    WebNavigation,
    Greeting,
    Help,
    Weather,
    Unknown,
}

impl Intent {
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Time => "time",
            Intent::Date => "date",
            Intent::EncyclopediaLookup => "wikipedia",
            Intent::WebNavigation => "web",
            Intent::Greeting => "greeting",
            Intent::Help => "help",
            Intent::Weather => "weather",
            Intent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Declarative form of one catalog row, before compilation.
pub struct IntentSpec {
    pub intent: Intent,
    pub patterns: &'static [&'static str],
    /// Keyword stripped from the input when a pattern matched without capturing.
    pub fallback_keyword: Option<&'static str>,
}

/// Declared order is precedence: earlier rows win, and within a row earlier patterns win.
pub const STANDARD_INTENTS: &[IntentSpec] = &[
    IntentSpec {
        intent: Intent::Time,
        patterns: &["what time is it", "tell me the time", "current time", "time"],
        fallback_keyword: None,
    },
    IntentSpec {
        intent: Intent::Date,
        patterns: &["what date is it", "tell me the date", "current date", "date", "what day is it"],
        fallback_keyword: None,
    },
    IntentSpec {
        intent: Intent::EncyclopediaLookup,
        patterns: &["search wikipedia for (.+)", "wikipedia (.+)", "look up (.+)", "tell me about (.+)"],
        fallback_keyword: Some("wikipedia"),
    },
    IntentSpec {
        intent: Intent::WebNavigation,
        patterns: &["open (.+)", "go to (.+)", "browse (.+)", "visit (.+)"],
        fallback_keyword: Some("open"),
    },
    IntentSpec {
        intent: Intent::Greeting,
        patterns: &["hello", "hi", "hey", "good morning", "good afternoon", "good evening"],
        fallback_keyword: None,
    },
    IntentSpec {
        intent: Intent::Help,
        patterns: &["help", "what can you do", "commands", "assistance"],
        fallback_keyword: None,
    },
    IntentSpec {
        intent: Intent::Weather,
        patterns: &["weather", "temperature", "forecast"],
        fallback_keyword: None,
    },
];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid pattern {pattern:?} for intent {intent}: {source}")]
    InvalidPattern {
        intent: Intent,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("pattern {pattern:?} for intent {intent} declares more than one capture group")]
    TooManyCaptures { intent: Intent, pattern: String },
}

#[derive(Debug, Clone)]
pub struct Pattern {
    pub intent: Intent,
    pub rule: Regex,
}

impl Pattern {
    pub fn has_capture(&self) -> bool {
        self.rule.captures_len() > 1
    }
}

#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub intent: Intent,
    pub patterns: Vec<Pattern>,
    pub fallback_keyword: Option<&'static str>,
}

/// Compiled, read-only intent table.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn standard() -> Result<Self, CatalogError> {
        Self::compile(STANDARD_INTENTS)
    }

    pub fn compile(specs: &[IntentSpec]) -> Result<Self, CatalogError> {
        let mut entries = Vec::with_capacity(specs.len());

        for spec in specs {
            let mut patterns = Vec::with_capacity(spec.patterns.len());
            for source in spec.patterns {
                let rule = RegexBuilder::new(source)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source_err| CatalogError::InvalidPattern {
                        intent: spec.intent,
                        pattern: source.to_string(),
                        source: source_err,
                    })?;

                if rule.captures_len() > 2 {
                    return Err(CatalogError::TooManyCaptures {
                        intent: spec.intent,
                        pattern: source.to_string(),
                    });
                }

                patterns.push(Pattern { intent: spec.intent, rule });
            }

            entries.push(CatalogEntry {
                intent: spec.intent,
                patterns,
                fallback_keyword: spec.fallback_keyword,
            });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn intents(&self) -> impl Iterator<Item = Intent> + '_ {
        self.entries.iter().map(|e| e.intent)
    }
}
