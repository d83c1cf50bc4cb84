use chrono::{Local, NaiveDate};

/// Source of the calendar date used for the daily quote.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Process-local wall clock. The timezone is whatever the host is set to, so
/// instances in different regions can roll over to a new quote at different
/// instants.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
