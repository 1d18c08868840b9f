use super::catalog::{Catalog, CatalogEntry, Intent};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub intent: Intent,
    pub argument: Option<String>,
    pub raw: String,
}

pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Best-effort argument recovery when a pattern matched without capturing.
/// Removes every occurrence of the keyword, so inputs naming the keyword twice lose both.
pub fn strip_keyword(normalized: &str, keyword: &str) -> String {
    normalized.replace(keyword, "").trim().to_string()
}

pub struct Matcher {
    catalog: Catalog,
}

impl Matcher {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// First intent in declared order wins; within an intent, first pattern wins.
    pub fn classify(&self, text: &str) -> Option<MatchResult> {
        let normalized = normalize(text);

        for entry in self.catalog.entries() {
            if let Some(argument) = Self::match_entry(entry, &normalized) {
                return Some(MatchResult {
                    intent: entry.intent,
                    argument,
                    raw: text.to_string(),
                });
            }
        }

        None
    }

    // Outer Option: did the entry match. Inner Option: the argument, if any.
    fn match_entry(entry: &CatalogEntry, normalized: &str) -> Option<Option<String>> {
        for pattern in &entry.patterns {
            let Some(caps) = pattern.rule.captures(normalized) else {
                continue;
            };

            let captured = caps
                .get(1)
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty());

            let argument = match (captured, entry.fallback_keyword) {
                (Some(arg), _) => Some(arg),
                (None, Some(keyword)) => Some(strip_keyword(normalized, keyword)),
                (None, None) => None,
            };

            return Some(argument);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::catalog::IntentSpec;

    #[test]
    fn strips_keyword_occurrences() {
        assert_eq!(strip_keyword("wikipedia rust", "wikipedia"), "rust");
        assert_eq!(strip_keyword("open open", "open"), "");
    }

    #[test]
    fn uncaptured_argument_intent_falls_back_to_keyword_strip() {
        let specs = [IntentSpec {
            intent: Intent::EncyclopediaLookup,
            patterns: &["wikipedia"],
            fallback_keyword: Some("wikipedia"),
        }];
        let matcher = Matcher::new(Catalog::compile(&specs).unwrap());
        let result = matcher.classify("Ferris the crab Wikipedia").unwrap();
        assert_eq!(result.argument.as_deref(), Some("ferris the crab"));
        assert_eq!(result.raw, "Ferris the crab Wikipedia");
    }
}
