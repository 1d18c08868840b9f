use super::catalog::Intent;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every failure a handler can hit. None of these reach the caller as a fault;
/// each one is turned into an apology by [`DispatchError::apology`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("input was empty")]
    InputEmpty,

    #[error("no pattern matched")]
    NoPatternMatch,

    #[error("no encyclopedia page for {query:?}")]
    LookupNotFound {
        query: String,
        /// A search hit was found but its page could not be loaded.
        page_missing: bool,
    },

    #[error("encyclopedia lookup for {query:?} is ambiguous")]
    LookupAmbiguous { query: String },

    #[error("encyclopedia lookup for {query:?} failed: {reason}")]
    LookupServiceFault { query: String, reason: String },

    #[error("could not resolve a url for {target:?}")]
    NavigationResolutionFault { target: String },

    #[error("could not open {target:?}: {reason}")]
    NavigationOpenFault { target: String, reason: String },

    #[error("clock unavailable for {intent}: {reason}")]
    ClockFault { intent: Intent, reason: String },
}

/// Payload-free mirror of [`DispatchError`] for telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FailureKind {
    InputEmpty,
    NoPatternMatch,
    LookupNotFound,
    LookupAmbiguous,
    LookupServiceFault,
    NavigationResolutionFault,
    NavigationOpenFault,
    ClockFault,
}

impl DispatchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            DispatchError::InputEmpty => FailureKind::InputEmpty,
            DispatchError::NoPatternMatch => FailureKind::NoPatternMatch,
            DispatchError::LookupNotFound { .. } => FailureKind::LookupNotFound,
            DispatchError::LookupAmbiguous { .. } => FailureKind::LookupAmbiguous,
            DispatchError::LookupServiceFault { .. } => FailureKind::LookupServiceFault,
            DispatchError::NavigationResolutionFault { .. } => FailureKind::NavigationResolutionFault,
            DispatchError::NavigationOpenFault { .. } => FailureKind::NavigationOpenFault,
            DispatchError::ClockFault { .. } => FailureKind::ClockFault,
        }
    }

    pub fn apology(&self) -> String {
        match self {
            DispatchError::InputEmpty => "I didn't hear anything.".to_string(),
            DispatchError::NoPatternMatch => "I'm not sure how to handle that command.".to_string(),
            DispatchError::LookupNotFound { query, page_missing: true } => {
                format!("I couldn't find a Wikipedia page for {query}. Try rephrasing your search.")
            }
            DispatchError::LookupNotFound { query, page_missing: false } => {
                format!("I couldn't find information about {query} on Wikipedia.")
            }
            DispatchError::LookupAmbiguous { query } => {
                format!("I found multiple results for {query}. Could you be more specific?")
            }
            DispatchError::LookupServiceFault { query, .. } => {
                format!("Sorry, I had trouble searching Wikipedia for {query}.")
            }
            DispatchError::NavigationResolutionFault { target }
            | DispatchError::NavigationOpenFault { target, .. } => {
                format!("Sorry, I couldn't open {target}.")
            }
            DispatchError::ClockFault { intent: Intent::Date, .. } => {
                "Sorry, I couldn't get the current date.".to_string()
            }
            DispatchError::ClockFault { .. } => "Sorry, I couldn't get the current time.".to_string(),
        }
    }
}
