// SPDX-License-Identifier: MIT

//! Retention sweep: a daily pass that deletes log files whose
//! date-from-filename has fallen outside the configured retention
//! window (spec §4.F, §6 `LogRetentionDays`).

use crate::paths::FILE_PREFIX;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Parse the date out of a log file name, e.g.
/// `filebridge_monitor_20260728.json` or
/// `filebridge_monitor_20260728_0002.json`. Returns `None` for anything
/// that doesn't match the expected shape rather than erroring, since
/// retention sweeps must not abort on an unrelated file in the log
/// directory.
pub fn parse_date_from_filename(name: &str) -> Option<NaiveDate> {
    let stem = name.strip_suffix(".json")?;
    let after_prefix = stem.strip_prefix(FILE_PREFIX)?;
    let date_part = after_prefix.split('_').next()?;
    NaiveDate::parse_from_str(date_part, "%Y%m%d").ok()
}

/// What a single retention pass did, for logging and tests.
#[derive(Debug, Default, Clone)]
pub struct RetentionOutcome {
    pub deleted: Vec<PathBuf>,
    /// Distinct dates that lost at least one file, so a caller holding
    /// a [`crate::LogSink`] can evict the matching cache entries.
    pub deleted_dates: Vec<NaiveDate>,
    pub kept: usize,
}

/// Delete every log file in `log_dir` whose filename date is older than
/// `retention_days` relative to `today`. Files whose name doesn't parse
/// are left alone (spec §4.F: unrelated files in the log directory are
/// not this sweep's concern).
pub fn run_retention(log_dir: &std::path::Path, retention_days: u32, today: NaiveDate) -> RetentionOutcome {
    let mut outcome = RetentionOutcome::default();
    let entries = match std::fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::warn!(path = %log_dir.display(), %error, "retention sweep could not read log directory");
            return outcome;
        }
    };

    for entry in entries.flatten() {
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue,
        };
        if !name.starts_with(FILE_PREFIX) {
            continue;
        }
        let Some(file_date) = parse_date_from_filename(&name) else {
            continue;
        };
        let age_days = (today - file_date).num_days();
        if age_days > i64::from(retention_days) {
            let path = entry.path();
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    outcome.deleted.push(path);
                    if !outcome.deleted_dates.contains(&file_date) {
                        outcome.deleted_dates.push(file_date);
                    }
                }
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "failed to delete expired log file");
                }
            }
        } else {
            outcome.kept += 1;
        }
    }

    outcome
}

/// Spawn the daily retention loop. Runs once immediately, then once
/// every 24h, until `shutdown` is signalled. `on_deleted` is invoked
/// once per distinct date that lost a file, so a [`crate::LogSink`]
/// sharing the same log directory can evict its matching cache entries
/// instead of leaving them to linger on a deleted date (spec §4.F).
pub fn spawn_retention_loop<C>(
    log_dir: PathBuf,
    retention_days: u32,
    clock: C,
    on_deleted: Arc<dyn Fn(NaiveDate) + Send + Sync>,
    mut shutdown: watch::Receiver<bool>,
) -> tokio::task::JoinHandle<()>
where
    C: fb_core::Clock + Send + 'static,
{
    tokio::spawn(async move {
        const ONE_DAY: Duration = Duration::from_secs(24 * 60 * 60);
        loop {
            let today = clock.now_utc().date_naive();
            let outcome = run_retention(&log_dir, retention_days, today);
            if !outcome.deleted.is_empty() {
                tracing::info!(deleted = outcome.deleted.len(), "retention sweep deleted expired logs");
            }
            for date in &outcome.deleted_dates {
                on_deleted(*date);
            }

            tokio::select! {
                _ = tokio::time::sleep(ONE_DAY) => {}
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
            }
            if *shutdown.borrow() {
                break;
            }
        }
    })
}

#[cfg(test)]
#[path = "retention_tests.rs"]
mod tests;
