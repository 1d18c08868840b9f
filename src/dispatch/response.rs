use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRequest {
    pub resolved_url: String,
}

/// What the dispatcher hands back for one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub text: String,
    pub navigation: Option<NavigationRequest>,
}

impl Response {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), navigation: None }
    }

    pub fn navigate(text: impl Into<String>, resolved_url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            navigation: Some(NavigationRequest { resolved_url: resolved_url.into() }),
        }
    }

    pub fn resolved_url(&self) -> Option<&str> {
        self.navigation.as_ref().map(|n| n.resolved_url.as_str())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
