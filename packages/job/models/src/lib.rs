#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Wire-facing types for job state: status enum, error log entries, match
//! entries, scheduling parameters, and the immutable status snapshot.
//!
//! Snapshot field names are pinned with serde renames because an existing
//! remote status consumer depends on them; change them and that caller
//! breaks silently.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use registry_watch_matcher::{HighlightSpan, MatchedField, NameMatch};
use registry_watch_record_models::DeathRecord;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Lifecycle state of a polling job.
///
/// There is no terminal "exhausted" state: a job whose every date keeps
/// failing still reports `Running`. Giving up on retries is the external
/// scheduler's policy decision.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    /// Polling is active or eligible to be scheduled.
    #[default]
    Running,
    /// Explicitly stopped. Accumulated state stays readable.
    Stopped,
}

/// One failed fetch attempt, recorded against its date.
///
/// Entries are append-only and never pruned, even after a later retry
/// succeeds; the error log is historical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEntry {
    /// The date whose fetch failed.
    pub date: NaiveDate,
    /// Failure message as reported by the fetcher.
    pub message: String,
    /// When the failure was recorded.
    pub timestamp: DateTime<Utc>,
}

/// A retrieved record paired with one target-name match annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMatch {
    /// The full record that matched.
    pub record: DeathRecord,
    /// The target name that matched, as configured.
    pub target: String,
    /// The record field the target matched in.
    pub field: MatchedField,
    /// `Some(100)` for exact-substring matches, `None` for word-overlap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    /// Spans to highlight in the matched field's original text.
    pub highlights: Vec<HighlightSpan>,
}

impl RecordMatch {
    /// Pairs a record with one matcher annotation.
    #[must_use]
    pub fn new(record: DeathRecord, annotation: NameMatch) -> Self {
        Self {
            record,
            target: annotation.target,
            field: annotation.field,
            score: annotation.score,
            highlights: annotation.highlights,
        }
    }
}

/// Scheduling parameters for one job's polling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollConfig {
    /// Delay between consecutive date fetches in the initial pass.
    pub interval: Duration,
    /// Delay before each retry sweep over the pending-retry dates.
    pub retry_interval: Duration,
    /// Maximum number of retry sweeps before the scheduler gives up.
    /// `None` keeps sweeping until the pending set drains or the job is
    /// stopped.
    pub max_retry_sweeps: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            retry_interval: Duration::from_secs(300),
            max_retry_sweeps: None,
        }
    }
}

/// Immutable, serializable view of a job's state at one instant.
///
/// Deep copies throughout; mutating a snapshot never touches the tracker
/// it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSnapshot {
    /// Opaque job identifier.
    pub job_id: String,
    /// Lifecycle state.
    pub status: JobStatus,
    /// When the job was created.
    pub start_time: DateTime<Utc>,
    /// When the last fetch result (success or failure) was recorded.
    pub last_update: Option<DateTime<Utc>>,
    /// Fetch attempts so far, successes and failures alike.
    pub total_requests: u64,
    /// Per-date match lists. Populated only when target names are
    /// configured, and only for dates with at least one record.
    pub found_dates: BTreeMap<NaiveDate, Vec<RecordMatch>>,
    /// Every deduplicated record retrieved so far, keyed by date.
    pub all_records: BTreeMap<NaiveDate, Vec<DeathRecord>>,
    /// The full historical error log, keyed by date.
    pub errors: BTreeMap<NaiveDate, Vec<ErrorEntry>>,
    /// Dates flagged for retry: they have recorded failures and no
    /// confirmed records yet.
    pub error_dates: Vec<NaiveDate>,
    /// Whether a retry sweep is currently in progress.
    pub retrying_errors: bool,
}
