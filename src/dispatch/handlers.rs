use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::catalog::Intent;
use super::error::DispatchError;
use super::navigation::{normalize_target, resolve_url, ShortcutTable};
use super::replies::{ASK_TOPIC, ASK_WEBSITE};
use super::response::Response;
use crate::services::clock::{format_date, format_time, Clock};
use crate::services::opener::NavigationOpener;
use crate::services::wikipedia::{EncyclopediaService, LookupError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupSettings {
    pub sentences: usize,
    pub search_results: usize,
    pub timeout: Duration,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            sentences: 2,
            search_results: 3,
            timeout: Duration::from_secs(8),
        }
    }
}

/// Intent handlers bound to their collaborators.
pub struct Handlers {
    pub clock: Arc<dyn Clock>,
    pub encyclopedia: Arc<dyn EncyclopediaService>,
    pub opener: Arc<dyn NavigationOpener>,
    pub shortcuts: ShortcutTable,
    pub lookup: LookupSettings,
    pub open_timeout: Duration,
}

fn according(summary: &str) -> Response {
    Response::text(format!("According to Wikipedia: {summary}"))
}

impl Handlers {
    pub fn time(&self) -> Result<Response, DispatchError> {
        let now = self.clock.now().map_err(|e| DispatchError::ClockFault {
            intent: Intent::Time,
            reason: e.to_string(),
        })?;
        Ok(Response::text(format!("The current time is {}", format_time(&now))))
    }

    pub fn date(&self) -> Result<Response, DispatchError> {
        let now = self.clock.now().map_err(|e| DispatchError::ClockFault {
            intent: Intent::Date,
            reason: e.to_string(),
        })?;
        Ok(Response::text(format!("Today is {}", format_date(&now))))
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, LookupError>
    where
        F: Future<Output = Result<T, LookupError>>,
    {
        match tokio::time::timeout(self.lookup.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Fault(format!(
                "timed out after {}ms",
                self.lookup.timeout.as_millis()
            ))),
        }
    }

    async fn summarize(&self, topic: &str) -> Result<String, LookupError> {
        self.bounded(self.encyclopedia.summarize(topic, self.lookup.sentences)).await
    }

    /// Direct summary, then a keyword search on a missing page, then the first option on ambiguity.
    pub async fn lookup(&self, argument: Option<&str>) -> Result<Response, DispatchError> {
        let Some(query) = argument.map(str::trim).filter(|q| !q.is_empty()) else {
            return Ok(Response::text(ASK_TOPIC));
        };

        info!("Searching Wikipedia for: {}", query);

        match self.summarize(query).await {
            Ok(summary) if !summary.trim().is_empty() => Ok(according(summary.trim())),
            Ok(_) => Err(DispatchError::LookupNotFound {
                query: query.to_string(),
                page_missing: false,
            }),
            Err(LookupError::PageNotFound) => self.lookup_by_search(query).await,
            Err(LookupError::Disambiguation(options)) => self.disambiguate(query, options).await,
            Err(LookupError::Fault(reason)) => Err(DispatchError::LookupServiceFault {
                query: query.to_string(),
                reason,
            }),
        }
    }

    async fn lookup_by_search(&self, query: &str) -> Result<Response, DispatchError> {
        debug!("No page for {}, falling back to search", query);

        let hits = self
            .bounded(self.encyclopedia.search(query, self.lookup.search_results))
            .await
            .map_err(|e| DispatchError::LookupServiceFault {
                query: query.to_string(),
                reason: e.to_string(),
            })?;

        let Some(top) = hits.first() else {
            return Err(DispatchError::LookupNotFound {
                query: query.to_string(),
                page_missing: false,
            });
        };

        match self.summarize(top).await {
            Ok(summary) => Ok(according(summary.trim())),
            Err(LookupError::PageNotFound) => Err(DispatchError::LookupNotFound {
                query: query.to_string(),
                page_missing: true,
            }),
            Err(LookupError::Disambiguation(options)) => self.disambiguate(query, options).await,
            Err(LookupError::Fault(reason)) => Err(DispatchError::LookupServiceFault {
                query: query.to_string(),
                reason,
            }),
        }
    }

    async fn disambiguate(&self, query: &str, options: Vec<String>) -> Result<Response, DispatchError> {
        let ambiguous = || DispatchError::LookupAmbiguous { query: query.to_string() };

        let Some(first) = options.into_iter().next() else {
            return Err(ambiguous());
        };

        match self.summarize(&first).await {
            Ok(summary) => Ok(Response::text(format!(
                "I found multiple results. Here's information about {first}: {}",
                summary.trim()
            ))),
            Err(e) => {
                debug!("Disambiguation option {} failed: {}", first, e);
                Err(ambiguous())
            }
        }
    }

    pub async fn navigate(&self, argument: Option<&str>) -> Result<Response, DispatchError> {
        let target = argument.map(normalize_target).unwrap_or_default();
        if target.is_empty() {
            return Ok(Response::text(ASK_WEBSITE));
        }

        let url = resolve_url(&target, &self.shortcuts)?;
        info!("Opening website: {}", url);

        let open_fault = |reason: String| DispatchError::NavigationOpenFault {
            target: target.clone(),
            reason,
        };

        match tokio::time::timeout(self.open_timeout, self.opener.open(&url)).await {
            Ok(Ok(())) => Ok(Response::navigate(format!("Opening {target}: {url}"), url)),
            Ok(Err(e)) => {
                warn!("Opener failed for {}: {}", url, e);
                Err(open_fault(e.to_string()))
            }
            Err(_) => Err(open_fault("opener timed out".to_string())),
        }
    }
}
