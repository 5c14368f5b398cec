#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Poll scheduling for registry watch jobs.
//!
//! [`run`] drives one full polling run: an initial pass over the job's
//! date range at the configured interval, then retry sweeps over the
//! pending-retry set until it drains, the sweep cap is reached, or the
//! job is stopped. The tracker itself never schedules anything; this
//! crate is the scheduler collaborator it expects.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use registry_watch_job::{FetchError, JobTracker};
use registry_watch_job_models::JobStatus;
use registry_watch_record_models::DeathRecord;

/// Source of raw records for a single calendar date.
///
/// Implementations wrap the external registry's protocol (session
/// handling, form posts, result-table parsing) and may be called
/// concurrently for distinct dates. The poller is the sole caller.
#[async_trait]
pub trait RecordFetcher: Send + Sync {
    /// Fetches all records the registry lists for `date`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the registry is unreachable or returns
    /// an unusable page. The failure is recorded against the date, which
    /// then becomes retry-eligible.
    async fn fetch(&self, date: NaiveDate) -> Result<Vec<DeathRecord>, FetchError>;
}

/// Runs one job to completion: initial pass, then retry sweeps.
///
/// Stopping is advisory and checked between fetches; an in-flight fetch
/// completes and its result is still recorded.
pub async fn run(tracker: Arc<JobTracker>, fetcher: Arc<dyn RecordFetcher>) {
    let poll = tracker.poll_config();
    log::info!(
        "job {}: polling {}..{}",
        tracker.id(),
        tracker.date_range().start(),
        tracker.date_range().end(),
    );

    for date in tracker.date_range().iter() {
        if tracker.status() == JobStatus::Stopped {
            log::info!("job {}: stopped during initial pass", tracker.id());
            return;
        }
        let result = fetcher.fetch(date).await;
        tracker.record_result(date, result);
        tokio::time::sleep(poll.interval).await;
    }

    let mut sweeps = 0u32;
    loop {
        if tracker.status() == JobStatus::Stopped {
            log::info!("job {}: stopped before retry sweep", tracker.id());
            break;
        }
        let pending = tracker.pending_retry_dates();
        if pending.is_empty() {
            break;
        }
        if poll.max_retry_sweeps.is_some_and(|cap| sweeps >= cap) {
            log::warn!(
                "job {}: {} date(s) still failing after {sweeps} retry sweep(s)",
                tracker.id(),
                pending.len(),
            );
            break;
        }

        tokio::time::sleep(poll.retry_interval).await;
        sweeps += 1;
        log::info!(
            "job {}: retry sweep {sweeps} over {} date(s)",
            tracker.id(),
            pending.len(),
        );
        tracker.begin_retry_sweep();
        for date in pending {
            if tracker.status() == JobStatus::Stopped {
                break;
            }
            let result = fetcher.fetch(date).await;
            tracker.record_result(date, result);
        }
        tracker.end_retry_sweep();
    }

    log::info!(
        "job {}: polling complete ({} request(s))",
        tracker.id(),
        tracker.total_requests(),
    );
}
