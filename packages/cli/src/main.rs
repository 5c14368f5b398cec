#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Offline replay tool for registry watch.
//!
//! Feeds a captured sequence of per-date fetch results through a job
//! tracker and prints the resulting status snapshot as JSON. Useful for
//! inspecting tracker and matcher behavior against saved registry output
//! without touching the live source.
//!
//! Capture format: a JSON array of entries, each either
//! `{"date": "2024-01-01", "records": [...]}` or
//! `{"date": "2024-01-02", "error": "timeout"}`.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use registry_watch_job::{DateRange, FetchError, JobTracker};
use registry_watch_job_models::PollConfig;
use registry_watch_record_models::DeathRecord;
use serde::Deserialize;

#[derive(Parser)]
#[command(
    name = "registry_watch_cli",
    about = "Replay captured registry fetches through a job tracker"
)]
struct Cli {
    /// Path to the JSON capture file.
    capture: PathBuf,
    /// Target name to match against records (repeatable). None means
    /// collect-all mode.
    #[arg(long = "target")]
    targets: Vec<String>,
    /// Pretty-print the snapshot JSON.
    #[arg(long)]
    pretty: bool,
}

/// One captured fetch outcome. Exactly one of `records`/`error` is set.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptureEntry {
    date: NaiveDate,
    #[serde(default)]
    records: Option<Vec<DeathRecord>>,
    #[serde(default)]
    error: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();
    let raw = fs::read_to_string(&cli.capture)?;
    let entries: Vec<CaptureEntry> = serde_json::from_str(&raw)?;

    let dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
    let range = DateRange::from_dates(&dates)?;
    let tracker = JobTracker::with_range(range, cli.targets, PollConfig::default());

    log::info!("replaying {} captured fetch(es)", entries.len());
    for entry in entries {
        let result = match (entry.records, entry.error) {
            (Some(records), _) => Ok(records),
            (None, Some(message)) => Err(FetchError::new(message)),
            (None, None) => Err(FetchError::new("capture entry has neither records nor error")),
        };
        tracker.record_result(entry.date, result);
    }

    let snapshot = tracker.snapshot();
    let out = if cli.pretty {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        serde_json::to_string(&snapshot)?
    };
    println!("{out}");

    Ok(())
}
