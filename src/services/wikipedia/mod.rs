pub mod client;

use async_trait::async_trait;
use thiserror::Error;

pub use client::WikipediaClient;

/// Tagged outcome of an encyclopedia call; handlers match on it instead of catching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("page not found")]
    PageNotFound,
    #[error("ambiguous topic ({} options)", .0.len())]
    Disambiguation(Vec<String>),
    #[error("lookup service fault: {0}")]
    Fault(String),
}

#[async_trait]
pub trait EncyclopediaService: Send + Sync {
    /// Plain-text summary of `topic`, at most `sentences` sentences long.
    async fn summarize(&self, topic: &str, sentences: usize) -> Result<String, LookupError>;

    /// Candidate page titles for `topic`, best first.
    async fn search(&self, topic: &str, limit: usize) -> Result<Vec<String>, LookupError>;
}
