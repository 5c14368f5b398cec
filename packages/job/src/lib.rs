#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Job lifecycle state machine for date-ranged registry polling.
//!
//! A [`JobTracker`] owns all state for one polling run: the date range,
//! status, accumulated records, per-date error log, and retry eligibility.
//! It performs no I/O and schedules nothing itself; an external scheduler
//! feeds it `(date, fetch result)` pairs and a status path reads immutable
//! snapshots.

mod range;
mod tracker;

pub use range::{DateRange, InvalidRangeError};
pub use tracker::JobTracker;

/// A failed fetch attempt for one date, as reported by the fetcher.
///
/// Carries only a display message; the tracker records failures verbatim
/// and never inspects them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    /// Human-readable description of the failure.
    pub message: String,
}

impl FetchError {
    /// Creates a fetch error from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
