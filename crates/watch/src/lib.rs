// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fb-watch: component A, the hybrid directory watcher (spec §4.A).
//!
//! Merges OS change notifications with a periodic rescan into a single
//! stream of candidate [`fb_core::FileEvent`]s. Neither source
//! deduplicates or filters — that is the admission filter's job
//! (`fb-engine`). This crate only ever decides *that something might
//! have happened*, never whether it should be acted on.

mod manual_scan;
mod notifier;
mod rescan;

use fb_core::{Clock, FileEvent};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};

pub use manual_scan::manual_scan;

#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("failed to create filesystem notifier: {0}")]
    NotifierInit(#[from] notify::Error),
    #[error("failed to enumerate directory {path}: {source}")]
    Enumerate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A running watcher for a single, non-recursive directory.
///
/// Owns the join handles for its notifier-bridge thread and its rescan
/// task; dropping a handle does not stop them, call [`Watcher::stop`]
/// (or signal the shared `shutdown` notify) for a clean teardown.
pub struct Watcher {
    shutdown: watch::Sender<bool>,
    rescan_task: tokio::task::JoinHandle<()>,
    notifier_task: tokio::task::JoinHandle<()>,
}

impl Watcher {
    /// Start watching `directory`, forwarding candidates to `tx`.
    ///
    /// The first rescan fires immediately; OS notifications begin as
    /// soon as the notifier thread finishes initializing.
    pub fn spawn<C: Clock>(
        directory: PathBuf,
        polling_interval: Duration,
        tx: mpsc::Sender<FileEvent>,
        clock: C,
    ) -> Self {
        let (shutdown, shutdown_rx) = watch::channel(false);

        let rescan_task = tokio::spawn(rescan::run(
            directory.clone(),
            polling_interval,
            tx.clone(),
            clock.clone(),
            shutdown_rx.clone(),
        ));

        let notifier_task = tokio::spawn(notifier::run(directory, tx, clock, shutdown_rx));

        Self {
            shutdown,
            rescan_task,
            notifier_task,
        }
    }

    /// Signal both background tasks to stop and wait for them to exit.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.rescan_task.await;
        let _ = self.notifier_task.await;
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
