//! Command classification and execution.
//!
//! Text flows `Dispatcher` -> `Matcher` -> handler -> `Response`. Classification
//! is ordered pattern matching over a fixed catalog; every handler failure is
//! recovered into an apology, so callers always get exactly one response.

pub mod catalog;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod history;
pub mod matcher;
pub mod navigation;
pub mod replies;
pub mod response;

pub use catalog::{Catalog, CatalogError, Intent};
pub use dispatcher::{Dispatched, Dispatcher, DispatcherBuilder, Outcome};
pub use error::{DispatchError, FailureKind};
pub use handlers::LookupSettings;
pub use history::{ConversationEntry, ConversationLog, Speaker};
pub use matcher::{MatchResult, Matcher};
pub use navigation::ShortcutTable;
pub use response::{NavigationRequest, Response};
