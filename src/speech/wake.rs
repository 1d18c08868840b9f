use crate::config::AssistantConfig;

/// Result of scanning one recognized phrase. Both flags can be set at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Heard {
    pub wake: bool,
    pub exit: bool,
}

#[derive(Debug, Clone)]
pub struct WakeWords {
    wake: Vec<String>,
    exit: Vec<String>,
}

impl WakeWords {
    pub fn new<W, E>(wake: W, exit: E) -> Self
    where
        W: IntoIterator,
        W::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let fold = |s: &str| s.trim().to_lowercase();
        Self {
            wake: wake.into_iter().map(|w| fold(w.as_ref())).filter(|w| !w.is_empty()).collect(),
            exit: exit.into_iter().map(|w| fold(w.as_ref())).filter(|w| !w.is_empty()).collect(),
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(&config.wake_words, &config.exit_words)
    }

    /// Substring containment against the lower-cased phrase.
    pub fn detect(&self, text: &str) -> Heard {
        let lower = text.to_lowercase();
        Heard {
            wake: self.wake.iter().any(|w| lower.contains(w.as_str())),
            exit: self.exit.iter().any(|w| lower.contains(w.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words() -> WakeWords {
        WakeWords::from_config(&AssistantConfig::default())
    }

    #[test]
    fn wake_phrase_anywhere() {
        let heard = words().detect("Okay, Hey Assistant!");
        assert!(heard.wake);
        assert!(!heard.exit);
    }

    #[test]
    fn exit_phrase() {
        let heard = words().detect("please shut down now");
        assert_eq!(heard, Heard { wake: false, exit: true });
    }

    #[test]
    fn overlapping_words_set_both() {
        // "assistant" is itself a wake word
        let heard = words().detect("stop assistant");
        assert_eq!(heard, Heard { wake: true, exit: true });
    }

    #[test]
    fn unrelated_speech() {
        assert_eq!(words().detect("what a nice day"), Heard::default());
    }
}
