// SPDX-License-Identifier: MIT

//! Periodic rescan: enumerate the directory, emit every regular file.
//!
//! Uses a single-shot timer rearmed *after* each tick completes rather
//! than a fixed-cadence `tokio::time::interval`, so a slow enumeration
//! (large directory, slow network share) never overlaps with itself
//! (spec §4.A: "no reentrancy"). The first rescan fires immediately.

use fb_core::{Clock, DetectionSource, EventKind, FileEvent};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{mpsc, watch};

pub(crate) async fn run<C: Clock>(
    directory: PathBuf,
    polling_interval: Duration,
    tx: mpsc::Sender<FileEvent>,
    clock: C,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        enumerate_once(&directory, &tx, &clock, DetectionSource::Polling).await;

        tokio::select! {
            _ = tokio::time::sleep(polling_interval) => {}
            _ = shutdown.changed() => break,
        }
        if *shutdown.borrow() {
            break;
        }
    }
}

/// Enumerate every regular (non-directory) file directly inside
/// `directory` (non-recursive per spec §4.A) and forward each as a
/// candidate event. Missing or unreadable directories are logged and
/// treated as yielding zero candidates — the profile stays idle and
/// retries on the next tick rather than crashing the watcher task.
pub(crate) async fn enumerate_once<C: Clock>(
    directory: &Path,
    tx: &mpsc::Sender<FileEvent>,
    clock: &C,
    source: DetectionSource,
) -> usize {
    let entries = match std::fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(error) => {
            tracing::warn!(
                directory = %directory.display(),
                %error,
                "rescan: failed to read watch directory"
            );
            return 0;
        }
    };

    let mut admitted = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        let is_file = entry
            .file_type()
            .map(|ft| ft.is_file())
            .unwrap_or(false);
        if !is_file {
            continue;
        }
        let event = FileEvent::new(path, EventKind::Created, source, clock.now_utc());
        if tx.send(event).await.is_ok() {
            admitted += 1;
        } else {
            break;
        }
    }
    admitted
}

#[cfg(test)]
#[path = "rescan_tests.rs"]
mod tests;
