//! Temporal clock collaborator
//!
//! Supplies the current calendar day for day-boundary decisions (daily
//! reset, streak anchoring, session dates). Abstracted so tests can pin
//! the day.

use chrono::{DateTime, NaiveDate, Utc};

/// Source of "now" for the core
pub trait Clock {
    /// The current calendar day (UTC)
    fn today(&self) -> NaiveDate;

    /// The current instant
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Test clock pinned to a fixed day
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
