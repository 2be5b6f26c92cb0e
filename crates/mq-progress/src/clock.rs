//! Date and time seam
//!
//! Day boundaries are local calendar days; timestamps are UTC.

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Source of "now" and "today"
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day
    fn today(&self) -> NaiveDate;
}

/// Wall clock, local calendar days
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
