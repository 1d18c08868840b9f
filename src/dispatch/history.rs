use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

const MAX_ENTRIES: usize = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub speaker: Speaker,
    pub message: String,
    pub timestamp: String,
}

/// Append-only exchange log, bounded to the most recent entries. Owned by the front-end, never by the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationLog {
    entries: VecDeque<ConversationEntry>,
    capacity: usize,
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::with_capacity(MAX_ENTRIES)
    }
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(2);
        Self {
            entries: VecDeque::with_capacity(capacity.min(MAX_ENTRIES)),
            capacity,
        }
    }

    /// Oldest entries are dropped once the log is full.
    pub fn append(&mut self, speaker: Speaker, message: impl Into<String>, timestamp: impl Into<String>) -> Uuid {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        let id = Uuid::new_v4();
        self.entries.push_back(ConversationEntry {
            id,
            speaker,
            message: message.into(),
            timestamp: timestamp.into(),
        });
        id
    }

    /// Appends a user message and its reply back to back.
    pub fn record_exchange(&mut self, user: &str, reply: &str, timestamp: &str) {
        self.append(Speaker::User, user, timestamp);
        self.append(Speaker::Assistant, reply, timestamp);
    }

    pub fn entries(&self) -> Vec<ConversationEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops the whole log. Individual entries are never edited.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_speaker_as_type() {
        let mut log = ConversationLog::new();
        log.append(Speaker::User, "hello", "10:00:00");
        let json = serde_json::to_value(&log.entries()[0]).unwrap();
        assert_eq!(json["type"], "user");
        assert_eq!(json["message"], "hello");
        assert_eq!(json["timestamp"], "10:00:00");
    }

    #[test]
    fn exchange_keeps_both_sides() {
        let mut log = ConversationLog::new();
        log.record_exchange("what time is it", "The current time is 02:07 PM", "14:07:09");

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].speaker, Speaker::User);
        assert_eq!(entries[1].speaker, Speaker::Assistant);
        assert!(entries.iter().all(|e| e.timestamp == "14:07:09"));
    }

    #[test]
    fn oldest_entries_are_dropped() {
        let mut log = ConversationLog::with_capacity(4);
        for n in 0..3 {
            log.record_exchange(&format!("q{n}"), &format!("a{n}"), "10:00:00");
        }

        let messages: Vec<String> = log.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["q1", "a1", "q2", "a2"]);
    }
}
