pub mod clock;
pub mod opener;
pub mod wikipedia;

pub use clock::{Clock, ClockError, FixedClock, SystemClock};
pub use opener::{NavigationOpener, NoopOpener, OpenError, SystemOpener};
pub use wikipedia::{EncyclopediaService, LookupError, WikipediaClient};
