use chrono::{Local, NaiveDateTime};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("clock unavailable: {0}")]
    Unavailable(String),
}

/// Wall-clock source in local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Result<NaiveDateTime, ClockError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<NaiveDateTime, ClockError> {
        Ok(Local::now().naive_local())
    }
}

/// Always reports the same instant. Used by demos with a pinned time and by tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> Result<NaiveDateTime, ClockError> {
        Ok(self.0)
    }
}

pub fn format_time(now: &NaiveDateTime) -> String {
    now.format("%I:%M %p").to_string()
}

pub fn format_date(now: &NaiveDateTime) -> String {
    now.format("%A, %B %d, %Y").to_string()
}

pub fn format_timestamp(now: &NaiveDateTime) -> String {
    now.format("%H:%M:%S").to_string()
}
