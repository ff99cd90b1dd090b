//! Calendar-day windows used by aggregation queries and retention.
//!
//! Both cutoffs are computed the same way: take the current UTC calendar
//! date, step back a whole number of calendar days, and use midnight UTC of
//! the resulting date. This is date arithmetic, not a multiple of 24 hours.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use hitstore_core::error::DomainError;

/// Midnight UTC of the date `days` calendar days before `today`.
fn midnight_days_before(
    today: NaiveDate,
    days: u32,
    field: &'static str,
) -> Result<DateTime<Utc>, DomainError> {
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .ok_or_else(|| DomainError::violation(field, "reaches before the earliest supported date"))
}

/// The lookback period for a daily aggregation query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingWindow {
    days: u32,
}

impl TrailingWindow {
    /// A window covering `days` calendar days before today, plus today.
    #[must_use]
    pub fn new(days: u32) -> Self {
        Self { days }
    }

    /// Number of calendar days looked back.
    #[must_use]
    pub fn days(self) -> u32 {
        self.days
    }

    /// Exclusive lower bound on event timestamps: midnight UTC of
    /// `today - days`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the subtraction leaves the
    /// supported date range.
    pub fn cutoff(self, today: NaiveDate) -> Result<DateTime<Utc>, DomainError> {
        midnight_days_before(today, self.days, "days")
    }
}

/// How long hit events are kept before the retention sweep deletes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    max_age_days: u32,
}

impl RetentionPolicy {
    /// Keep events from the last `max_age_days` calendar days.
    #[must_use]
    pub fn new(max_age_days: u32) -> Self {
        Self { max_age_days }
    }

    /// Number of calendar days kept.
    #[must_use]
    pub fn max_age_days(self) -> u32 {
        self.max_age_days
    }

    /// Events strictly before this instant are expired.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the subtraction leaves the
    /// supported date range.
    pub fn cutoff(self, today: NaiveDate) -> Result<DateTime<Utc>, DomainError> {
        midnight_days_before(today, self.max_age_days, "max_age_days")
    }
}
