//! The per-job state machine: record accumulation, per-date errors, retry
//! eligibility, and snapshot reads.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, NaiveDate, Utc};
use registry_watch_job_models::{ErrorEntry, JobSnapshot, JobStatus, PollConfig, RecordMatch};
use registry_watch_matcher as matcher;
use registry_watch_record_models::{DeathRecord, RecordKey};
use uuid::Uuid;

use crate::{DateRange, FetchError, InvalidRangeError};

/// Tracks one polling run over a fixed date range.
///
/// All mutable state sits behind a single lock so a status read never
/// observes a date with records appended but matches not yet recomputed.
/// The fetch-completion path is the only logical writer; [`Self::snapshot`]
/// takes a read lock and deep-copies. Safe under concurrent
/// `record_result` calls for different dates (the critical section covers
/// the whole call), though the scheduler is expected to keep at most one
/// fetch in flight per date.
#[derive(Debug)]
pub struct JobTracker {
    id: Uuid,
    range: DateRange,
    target_names: Vec<String>,
    poll: PollConfig,
    start_time: DateTime<Utc>,
    state: RwLock<JobState>,
}

#[derive(Debug, Default)]
struct JobState {
    status: JobStatus,
    last_update: Option<DateTime<Utc>>,
    total_requests: u64,
    records_by_date: BTreeMap<NaiveDate, Vec<DeathRecord>>,
    matches_by_date: BTreeMap<NaiveDate, Vec<RecordMatch>>,
    errors_by_date: BTreeMap<NaiveDate, Vec<ErrorEntry>>,
    pending_retry: BTreeSet<NaiveDate>,
    retrying_errors: bool,
}

impl JobTracker {
    /// Creates a job over the inclusive `start..=end` date range.
    ///
    /// An empty `target_names` puts the job in collect-all mode: records
    /// accumulate but no matching runs.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRangeError`] when `start > end`. This is the only
    /// failure the tracker ever surfaces; everything after creation is
    /// absorbed into state.
    pub fn create(
        start: NaiveDate,
        end: NaiveDate,
        target_names: Vec<String>,
        poll: PollConfig,
    ) -> Result<Self, InvalidRangeError> {
        Ok(Self::with_range(
            DateRange::new(start, end)?,
            target_names,
            poll,
        ))
    }

    /// Creates a job over an already-validated range.
    #[must_use]
    pub fn with_range(range: DateRange, target_names: Vec<String>, poll: PollConfig) -> Self {
        let id = Uuid::new_v4();
        log::info!(
            "job {id}: created for {}..{} ({} target name(s))",
            range.start(),
            range.end(),
            target_names.len(),
        );
        Self {
            id,
            range,
            target_names,
            poll,
            start_time: Utc::now(),
            state: RwLock::new(JobState::default()),
        }
    }

    /// Opaque job identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The date range this job polls.
    #[must_use]
    pub const fn date_range(&self) -> DateRange {
        self.range
    }

    /// The configured target names. Empty means collect-all mode.
    #[must_use]
    pub fn target_names(&self) -> &[String] {
        &self.target_names
    }

    /// Scheduling parameters the external scheduler should honor.
    #[must_use]
    pub const fn poll_config(&self) -> PollConfig {
        self.poll
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> JobStatus {
        self.read().status
    }

    /// Fetch attempts recorded so far, successes and failures alike.
    #[must_use]
    pub fn total_requests(&self) -> u64 {
        self.read().total_requests
    }

    /// Dates flagged for retry: they have recorded failures and no
    /// confirmed records yet. Chronologically ordered.
    #[must_use]
    pub fn pending_retry_dates(&self) -> Vec<NaiveDate> {
        self.read().pending_retry.iter().copied().collect()
    }

    /// Records the outcome of one fetch attempt for `date`.
    ///
    /// Counts the attempt and stamps the update time regardless of
    /// outcome, job status, or whether `date` lies inside the range
    /// (upstream is authoritative on what it fetched; out-of-range
    /// results are kept for audit).
    ///
    /// On success, new records are appended after deduplication by
    /// natural key and the date's matches are recomputed from the full
    /// deduplicated set, so re-fetching a date never duplicates records
    /// or match entries. A date with at least one confirmed record leaves
    /// the pending-retry set and never re-enters it.
    ///
    /// On failure, the error is appended to the date's historical log and
    /// the date becomes retry-eligible unless it already has confirmed
    /// records.
    pub fn record_result(&self, date: NaiveDate, result: Result<Vec<DeathRecord>, FetchError>) {
        let mut guard = self.write();
        let state = &mut *guard;
        state.total_requests += 1;
        state.last_update = Some(Utc::now());

        match result {
            Ok(records) => {
                let slot = state.records_by_date.entry(date).or_default();
                let mut seen: HashSet<RecordKey> =
                    slot.iter().map(DeathRecord::natural_key).collect();
                let mut appended = 0usize;
                for record in records {
                    if seen.insert(record.natural_key()) {
                        slot.push(record);
                        appended += 1;
                    }
                }

                // An empty page does not confirm a date: prior failures
                // stay queued until at least one record lands.
                if !slot.is_empty() {
                    state.pending_retry.remove(&date);
                }

                if appended > 0 && !self.target_names.is_empty() {
                    let matches: Vec<RecordMatch> = slot
                        .iter()
                        .flat_map(|record| {
                            matcher::match_targets(record, &self.target_names)
                                .into_iter()
                                .map(|annotation| RecordMatch::new(record.clone(), annotation))
                        })
                        .collect();
                    log::debug!(
                        "job {}: {date}: {} match(es) across {} record(s)",
                        self.id,
                        matches.len(),
                        slot.len(),
                    );
                    state.matches_by_date.insert(date, matches);
                }

                log::debug!("job {}: {date}: +{appended} record(s)", self.id);
            }
            Err(error) => {
                log::warn!("job {}: fetch failed for {date}: {error}", self.id);
                let confirmed = state
                    .records_by_date
                    .get(&date)
                    .is_some_and(|records| !records.is_empty());
                state.errors_by_date.entry(date).or_default().push(ErrorEntry {
                    date,
                    message: error.message,
                    timestamp: Utc::now(),
                });
                if !confirmed {
                    state.pending_retry.insert(date);
                }
            }
        }
    }

    /// Marks a retry sweep as in progress. Idempotent.
    pub fn begin_retry_sweep(&self) {
        let mut state = self.write();
        if !state.retrying_errors {
            state.retrying_errors = true;
            log::debug!("job {}: retry sweep started", self.id);
        }
    }

    /// Marks the retry sweep as finished. Idempotent.
    pub fn end_retry_sweep(&self) {
        let mut state = self.write();
        if state.retrying_errors {
            state.retrying_errors = false;
            log::debug!("job {}: retry sweep finished", self.id);
        }
    }

    /// Stops the job. Idempotent and advisory: it flips the status so the
    /// scheduler stops issuing fetches, but does not preempt an in-flight
    /// fetch, and results arriving afterwards are still recorded.
    pub fn stop(&self) {
        let mut state = self.write();
        if state.status != JobStatus::Stopped {
            state.status = JobStatus::Stopped;
            log::info!("job {}: stopped", self.id);
        }
    }

    /// Returns a deep, immutable copy of the job's state, safe to
    /// serialize and to hand across the status API boundary. Never
    /// aliases the tracker's internal containers.
    #[must_use]
    pub fn snapshot(&self) -> JobSnapshot {
        let state = self.read();
        JobSnapshot {
            job_id: self.id.to_string(),
            status: state.status,
            start_time: self.start_time,
            last_update: state.last_update,
            total_requests: state.total_requests,
            found_dates: state.matches_by_date.clone(),
            all_records: state.records_by_date.clone(),
            errors: state.errors_by_date.clone(),
            error_dates: state.pending_retry.iter().copied().collect(),
            retrying_errors: state.retrying_errors,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, JobState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, JobState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
