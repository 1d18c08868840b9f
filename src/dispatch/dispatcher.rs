use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::catalog::{Catalog, CatalogError, Intent};
use super::error::{DispatchError, FailureKind};
use super::handlers::{Handlers, LookupSettings};
use super::matcher::{MatchResult, Matcher};
use super::navigation::ShortcutTable;
use super::replies::{self, GREETINGS, HELP_TEXT, UNKNOWN_SUGGESTIONS, WEATHER_STUB};
use super::response::Response;
use crate::config::AssistantConfig;
use crate::services::clock::{format_timestamp, Clock, SystemClock};
use crate::services::opener::{NavigationOpener, NoopOpener};
use crate::services::wikipedia::{EncyclopediaService, WikipediaClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Answered,
    Recovered(FailureKind),
    Unmatched,
    EmptyInput,
}

/// A response together with how it was produced.
#[derive(Debug, Clone)]
pub struct Dispatched {
    pub response: Response,
    pub intent: Intent,
    pub outcome: Outcome,
    pub elapsed: Duration,
}

/// Maps free text to exactly one response. Holds no per-call state.
pub struct Dispatcher {
    matcher: Matcher,
    handlers: Handlers,
    rng: Mutex<ChaCha8Rng>,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.handlers.clock
    }

    pub fn classify(&self, text: &str) -> Option<MatchResult> {
        self.matcher.classify(text)
    }

    /// Never fails: internal faults come back as apology text.
    pub async fn process_command(&self, text: &str) -> Response {
        self.dispatch(text).await.response
    }

    pub async fn dispatch(&self, text: &str) -> Dispatched {
        let started = Instant::now();

        if text.trim().is_empty() {
            debug!("Empty command, nothing to dispatch");
            return Dispatched {
                response: Response::text(DispatchError::InputEmpty.apology()),
                intent: Intent::Unknown,
                outcome: Outcome::EmptyInput,
                elapsed: started.elapsed(),
            };
        }

        debug!("Processing command: {}", text.trim().to_lowercase());

        let Some(matched) = self.matcher.classify(text) else {
            info!(intent = %Intent::Unknown, "No pattern matched");
            return Dispatched {
                response: Response::text(self.choose(UNKNOWN_SUGGESTIONS)),
                intent: Intent::Unknown,
                outcome: Outcome::Unmatched,
                elapsed: started.elapsed(),
            };
        };

        info!(intent = %matched.intent, "Command classified");

        let (response, outcome) = match self.execute(&matched).await {
            Ok(response) => (response, Outcome::Answered),
            Err(e) => {
                warn!(intent = %matched.intent, "Recovered from {}", e);
                (Response::text(e.apology()), Outcome::Recovered(e.kind()))
            }
        };

        Dispatched {
            response,
            intent: matched.intent,
            outcome,
            elapsed: started.elapsed(),
        }
    }

    async fn execute(&self, matched: &MatchResult) -> Result<Response, DispatchError> {
        let argument = matched.argument.as_deref();

        match matched.intent {
            Intent::Time => self.handlers.time(),
            Intent::Date => self.handlers.date(),
            Intent::EncyclopediaLookup => self.handlers.lookup(argument).await,
            Intent::WebNavigation => self.handlers.navigate(argument).await,
            Intent::Greeting => Ok(Response::text(self.choose(GREETINGS))),
            Intent::Help => Ok(Response::text(HELP_TEXT)),
            Intent::Weather => Ok(Response::text(WEATHER_STUB)),
            Intent::Unknown => Ok(Response::text(self.choose(UNKNOWN_SUGGESTIONS))),
        }
    }

    fn choose(&self, choices: &[&'static str]) -> &'static str {
        // A poisoned lock only means another caller panicked mid-draw; the generator is still usable.
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        replies::pick(&mut *rng, choices)
    }

    /// `HH:MM:SS` from the injected clock, or a placeholder when it is unreadable.
    pub fn timestamp(&self) -> String {
        self.handlers
            .clock
            .now()
            .map(|now| format_timestamp(&now))
            .unwrap_or_else(|_| "--:--:--".to_string())
    }
}

pub struct DispatcherBuilder {
    catalog: Option<Catalog>,
    clock: Arc<dyn Clock>,
    encyclopedia: Option<Arc<dyn EncyclopediaService>>,
    opener: Arc<dyn NavigationOpener>,
    shortcuts: ShortcutTable,
    lookup: LookupSettings,
    open_timeout: Duration,
    seed: Option<u64>,
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self {
            catalog: None,
            clock: Arc::new(SystemClock),
            encyclopedia: None,
            opener: Arc::new(NoopOpener),
            shortcuts: ShortcutTable::default(),
            lookup: LookupSettings::default(),
            open_timeout: Duration::from_secs(3),
            seed: None,
        }
    }
}

impl DispatcherBuilder {
    /// Settings from configuration; collaborators keep their defaults until overridden.
    pub fn from_config(config: &AssistantConfig) -> Self {
        let wiki = &config.wikipedia;
        Self::default()
            .shortcuts(config.navigation.shortcuts.clone())
            .open_timeout(Duration::from_millis(config.navigation.timeout_ms))
            .lookup(LookupSettings {
                sentences: wiki.sentences,
                search_results: wiki.search_results,
                timeout: Duration::from_millis(wiki.timeout_ms),
            })
            .encyclopedia(Arc::new(WikipediaClient::new(
                wiki.api_url.clone(),
                Duration::from_millis(wiki.timeout_ms),
            )))
    }

    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn encyclopedia(mut self, encyclopedia: Arc<dyn EncyclopediaService>) -> Self {
        self.encyclopedia = Some(encyclopedia);
        self
    }

    pub fn opener(mut self, opener: Arc<dyn NavigationOpener>) -> Self {
        self.opener = opener;
        self
    }

    pub fn shortcuts(mut self, shortcuts: ShortcutTable) -> Self {
        self.shortcuts = shortcuts;
        self
    }

    pub fn lookup(mut self, lookup: LookupSettings) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn open_timeout(mut self, timeout: Duration) -> Self {
        self.open_timeout = timeout;
        self
    }

    /// Fixes the greeting/unknown reply sequence.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<Dispatcher, CatalogError> {
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => Catalog::standard()?,
        };

        let rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let encyclopedia = self
            .encyclopedia
            .unwrap_or_else(|| Arc::new(WikipediaClient::default()));

        Ok(Dispatcher {
            matcher: Matcher::new(catalog),
            handlers: Handlers {
                clock: self.clock,
                encyclopedia,
                opener: self.opener,
                shortcuts: self.shortcuts,
                lookup: self.lookup,
                open_timeout: self.open_timeout,
            },
            rng: Mutex::new(rng),
        })
    }
}
