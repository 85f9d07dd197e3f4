//! Source of "today" for date-sensitive rules

use chrono::{NaiveDate, Utc};

/// Calendar clock
pub trait Clock: Send + Sync {
    /// Current UTC calendar date
    fn today(&self) -> NaiveDate;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock stuck on one date, for tests and replays
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
