use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::DispatchError;

pub const STANDARD_SHORTCUTS: &[(&str, &str)] = &[
    ("google", "https://www.google.com"),
    ("youtube", "https://www.youtube.com"),
    ("facebook", "https://www.facebook.com"),
    ("twitter", "https://www.twitter.com"),
    ("instagram", "https://www.instagram.com"),
    ("linkedin", "https://www.linkedin.com"),
    ("github", "https://www.github.com"),
    ("reddit", "https://www.reddit.com"),
    ("amazon", "https://www.amazon.com"),
    ("wikipedia", "https://www.wikipedia.org"),
    ("stack overflow", "https://stackoverflow.com"),
    ("gmail", "https://mail.google.com"),
];

/// Spoken site names mapped to canonical URLs. Keys are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct ShortcutTable(BTreeMap<String, String>);

impl From<BTreeMap<String, String>> for ShortcutTable {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self::new(map)
    }
}

impl From<ShortcutTable> for BTreeMap<String, String> {
    fn from(table: ShortcutTable) -> Self {
        table.0
    }
}

impl ShortcutTable {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.as_ref().trim().to_lowercase(), v.into()))
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ShortcutTable {
    fn default() -> Self {
        Self::new(STANDARD_SHORTCUTS.iter().copied())
    }
}

pub fn normalize_target(target: &str) -> String {
    target.trim().to_lowercase()
}

/// Turns a spoken target into a URL. `target` must already be normalized.
pub fn resolve_url(target: &str, shortcuts: &ShortcutTable) -> Result<String, DispatchError> {
    let url = if let Some(mapped) = shortcuts.get(target) {
        mapped.to_string()
    } else if target.starts_with("http://") || target.starts_with("https://") {
        target.to_string()
    } else if target.contains('.') {
        format!("https://{target}")
    } else {
        format!("https://www.{target}.com")
    };

    if url.chars().any(char::is_control) {
        return Err(DispatchError::NavigationResolutionFault { target: target.to_string() });
    }

    Ok(url)
}
