// SPDX-License-Identifier: MIT

//! OS change-notification bridge (spec §4.A, failure recovery).
//!
//! `notify`'s callback runs on its own internal thread and is
//! synchronous, so we bridge it through a `std::sync::mpsc` channel
//! drained on a `spawn_blocking` task rather than ever calling async
//! code from inside the notify callback itself. If the notification
//! channel raises an error the blocking task returns and the outer
//! async loop logs it, sleeps ~1s, and rebuilds the notifier — rescans
//! (a separate task) keep running throughout, so no events are
//! permanently lost during an outage.

use fb_core::{Clock, DetectionSource, EventKind, FileEvent};
use notify::{Config, Event as NotifyEvent, RecommendedWatcher, RecursiveMode, Watcher as _};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

use crate::WatcherError;

pub(crate) async fn run<C: Clock>(
    directory: PathBuf,
    tx: mpsc::Sender<FileEvent>,
    clock: C,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        if *shutdown.borrow() {
            return;
        }

        let outcome = {
            let directory = directory.clone();
            let tx = tx.clone();
            let clock = clock.clone();
            let shutdown = shutdown.clone();
            tokio::task::spawn_blocking(move || watch_until_error(directory, tx, clock, shutdown))
                .await
        };

        match outcome {
            Ok(Ok(())) => return,
            Ok(Err(error)) => {
                tracing::warn!(
                    directory = %directory.display(),
                    %error,
                    "watcher: notification channel failed, rebuilding notifier"
                );
            }
            Err(join_error) => {
                tracing::error!(
                    directory = %directory.display(),
                    error = %join_error,
                    "watcher: notifier task panicked, rebuilding notifier"
                );
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(1)) => {}
            _ = shutdown.changed() => {}
        }
    }
}

/// Runs one generation of the OS notifier until it errors, the process
/// disconnects, or shutdown is requested. `Ok(())` means "stop cleanly";
/// `Err` means "rebuild".
fn watch_until_error<C: Clock>(
    directory: PathBuf,
    tx: mpsc::Sender<FileEvent>,
    clock: C,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), WatcherError> {
    let (std_tx, std_rx) = std::sync::mpsc::channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<NotifyEvent, notify::Error>| {
            let _ = std_tx.send(res);
        },
        Config::default(),
    )?;
    watcher.watch(&directory, RecursiveMode::NonRecursive)?;

    loop {
        if *shutdown.borrow() {
            return Ok(());
        }
        match std_rx.recv_timeout(Duration::from_millis(500)) {
            Ok(Ok(event)) => {
                let Some(kind) = map_event_kind(&event.kind) else {
                    continue;
                };
                for path in event.paths {
                    let file_event =
                        FileEvent::new(path, kind, DetectionSource::FileSystemEvent, clock.now_utc());
                    if tx.blocking_send(file_event).is_err() {
                        return Ok(());
                    }
                }
            }
            Ok(Err(notify_error)) => return Err(WatcherError::NotifierInit(notify_error)),
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => return Ok(()),
        }
    }
}

/// Union of name/last-write/creation-time changes (spec §4.A item 1).
fn map_event_kind(kind: &notify::EventKind) -> Option<EventKind> {
    use notify::EventKind as NK;
    match kind {
        NK::Create(_) => Some(EventKind::Created),
        NK::Modify(_) => Some(EventKind::Changed),
        NK::Remove(_) | NK::Access(_) | NK::Other | NK::Any => None,
    }
}

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
