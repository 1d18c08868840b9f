use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{EncyclopediaService, LookupError};

pub const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";
const USER_AGENT: &str = concat!("parley/", env!("CARGO_PKG_VERSION"), " (voice command dispatcher)");
const MAX_OPTIONS: usize = 20;

/// MediaWiki Action API client.
#[derive(Clone)]
pub struct WikipediaClient {
    client: Client,
    api_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    #[serde(default)]
    query: Option<QueryBody>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Default, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Vec<Page>,
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    pageprops: Option<PageProps>,
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    #[serde(default)]
    disambiguation: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Link {
    title: String,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

/// What a summary query says about its page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SummaryPage {
    Missing,
    Disambiguation { title: String },
    Extract(String),
}

impl ApiResponse {
    fn into_query(self) -> Result<QueryBody, LookupError> {
        if let Some(err) = self.error {
            return Err(LookupError::Fault(format!("{}: {}", err.code, err.info)));
        }
        Ok(self.query.unwrap_or_default())
    }

    pub(crate) fn summary_page(self) -> Result<SummaryPage, LookupError> {
        let query = self.into_query()?;
        let Some(page) = query.pages.into_iter().next() else {
            return Ok(SummaryPage::Missing);
        };

        if page.missing || page.invalid {
            return Ok(SummaryPage::Missing);
        }

        let is_disambiguation = page
            .pageprops
            .as_ref()
            .map(|p| p.disambiguation.is_some())
            .unwrap_or(false);
        if is_disambiguation {
            return Ok(SummaryPage::Disambiguation { title: page.title });
        }

        Ok(SummaryPage::Extract(page.extract.unwrap_or_default().trim().to_string()))
    }

    pub(crate) fn link_titles(self) -> Result<Vec<String>, LookupError> {
        let query = self.into_query()?;
        Ok(query
            .pages
            .into_iter()
            .flat_map(|p| p.links)
            .map(|l| l.title)
            .take(MAX_OPTIONS)
            .collect())
    }

    pub(crate) fn search_titles(self) -> Result<Vec<String>, LookupError> {
        let query = self.into_query()?;
        Ok(query.search.into_iter().map(|h| h.title).collect())
    }
}

impl WikipediaClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
            api_url: api_url.into(),
        }
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<ApiResponse, LookupError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await
            .map_err(|e| LookupError::Fault(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LookupError::Fault(format!("Wikipedia API error: {}", response.status())));
        }

        response
            .json::<ApiResponse>()
            .await
            .map_err(|e| LookupError::Fault(e.to_string()))
    }

    async fn disambiguation_options(&self, title: &str) -> Result<Vec<String>, LookupError> {
        let limit = MAX_OPTIONS.to_string();
        self.query(&[
            ("prop", "links"),
            ("titles", title),
            ("plnamespace", "0"),
            ("pllimit", limit.as_str()),
        ])
        .await?
        .link_titles()
    }
}

impl Default for WikipediaClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, Duration::from_secs(5))
    }
}

#[async_trait]
impl EncyclopediaService for WikipediaClient {
    async fn summarize(&self, topic: &str, sentences: usize) -> Result<String, LookupError> {
        debug!("Wikipedia summary request: {}", topic);
        let sentences = sentences.max(1).to_string();

        let page = self
            .query(&[
                ("prop", "extracts|pageprops"),
                ("ppprop", "disambiguation"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("exsentences", sentences.as_str()),
                ("redirects", "1"),
                ("titles", topic),
            ])
            .await?
            .summary_page()?;

        match page {
            SummaryPage::Missing => Err(LookupError::PageNotFound),
            SummaryPage::Extract(text) => Ok(text),
            SummaryPage::Disambiguation { title } => {
                let options = self.disambiguation_options(&title).await.unwrap_or_else(|e| {
                    warn!("Failed to list options for {}: {}", title, e);
                    Vec::new()
                });
                Err(LookupError::Disambiguation(options))
            }
        }
    }

    async fn search(&self, topic: &str, limit: usize) -> Result<Vec<String>, LookupError> {
        debug!("Wikipedia search request: {}", topic);
        let limit = limit.max(1).to_string();
        self.query(&[
            ("list", "search"),
            ("srsearch", topic),
            ("srlimit", limit.as_str()),
            ("srprop", ""),
        ])
        .await?
        .search_titles()
    }
}
