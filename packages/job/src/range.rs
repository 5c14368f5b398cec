//! Inclusive calendar date ranges with creation-time validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Rejected date range at job creation. The only fatal error the job
/// layer produces; everything after creation is absorbed into state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRangeError {
    /// The range contains no dates.
    #[error("date range is empty")]
    Empty,
    /// The start date falls after the end date.
    #[error("date range start {start} is after end {end}")]
    Inverted {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },
}

/// An inclusive range of calendar dates to poll, fixed at job creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Builds a validated range.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRangeError::Inverted`] when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidRangeError> {
        if start > end {
            return Err(InvalidRangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Builds a range spanning an ordered sequence of dates (first to
    /// last, inclusive).
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRangeError::Empty`] for an empty sequence and
    /// [`InvalidRangeError::Inverted`] when the first date falls after
    /// the last.
    pub fn from_dates(dates: &[NaiveDate]) -> Result<Self, InvalidRangeError> {
        match (dates.first(), dates.last()) {
            (Some(&start), Some(&end)) => Self::new(start, end),
            _ => Err(InvalidRangeError::Empty),
        }
    }

    /// First date of the range.
    #[must_use]
    pub const fn start(self) -> NaiveDate {
        self.start
    }

    /// Last date of the range (inclusive).
    #[must_use]
    pub const fn end(self) -> NaiveDate {
        self.end
    }

    /// Number of calendar dates covered. Always at least 1.
    #[must_use]
    pub fn days(self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Iterates the range's dates in chronological order.
    pub fn iter(self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take_while(move |d| *d <= self.end)
    }

    /// Whether `date` falls inside the range.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
