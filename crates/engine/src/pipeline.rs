// SPDX-License-Identifier: MIT

//! `ProfilePipeline`: the installed (Watcher, Admission, Queue,
//! Readiness, Launcher) instance for one [`WatchProfile`] (spec §2,
//! §4.H "Config Manager" glossary entry).

use crate::active_set::ActiveFileSet;
use crate::admission;
use crate::cooldown::CooldownMap;
use crate::launcher::Launcher;
use crate::queue::{self, WorkSender};
use crate::readiness::{self, ReadinessOutcome};
use crate::EngineError;
use fb_core::{Clock, DetectionSource, EventKind, FileEvent, LogKind, SystemClock, WatchProfile};
use fb_storage::LogAppender;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;

/// Worker drain timeout on profile stop (spec §5).
const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

struct Running {
    watcher: fb_watch::Watcher,
    admission_task: JoinHandle<()>,
    workers: Vec<JoinHandle<()>>,
    /// Kept alive so manual scans can enqueue; dropping it (on stop)
    /// is what lets the work queue close and workers drain.
    queue_tx: WorkSender,
    gc_shutdown: watch::Sender<bool>,
    gc_task: JoinHandle<()>,
}

pub struct ProfilePipeline<C: Clock = SystemClock> {
    profile: WatchProfile,
    clock: C,
    active: Arc<ActiveFileSet>,
    cooldown: Arc<CooldownMap>,
    launcher: Arc<Launcher>,
    running: Option<Running>,
}

impl<C: Clock> ProfilePipeline<C> {
    /// Install and start a profile's pipeline. If the watch directory
    /// doesn't exist, the profile logs a `WatcherError` and comes up
    /// idle rather than failing (spec §3, §7: non-fatal to siblings).
    pub async fn start(profile: WatchProfile, log: Arc<dyn LogAppender>, clock: C) -> Self {
        let active = Arc::new(ActiveFileSet::new());
        let cooldown = Arc::new(CooldownMap::new());
        let launcher = Arc::new(Launcher::new(profile.max_concurrent_processes));

        if !profile.watch_directory.is_dir() {
            let _ = log
                .append(
                    LogKind::WatcherError,
                    format!(
                        "watch directory {} does not exist; profile '{}' is idle",
                        profile.watch_directory.display(),
                        profile.name
                    ),
                    None,
                )
                .await;
            return Self {
                profile,
                clock,
                active,
                cooldown,
                launcher,
                running: None,
            };
        }

        let (candidate_tx, candidate_rx) = tokio::sync::mpsc::channel::<FileEvent>(queue::QUEUE_CAPACITY);
        let (queue_tx, queue_rx) = queue::channel();
        let queue_rx = Arc::new(AsyncMutex::new(queue_rx));

        let watcher = fb_watch::Watcher::spawn(
            profile.watch_directory.clone(),
            Duration::from_secs(profile.polling_interval_seconds),
            candidate_tx,
            clock.clone(),
        );

        let admission_task = tokio::spawn(run_admission_loop(
            profile.clone(),
            Arc::clone(&active),
            Arc::clone(&cooldown),
            queue_tx.clone(),
            clock.clone(),
            Arc::clone(&log),
            candidate_rx,
        ));

        let workers = (0..profile.worker_pool_size())
            .map(|_| {
                tokio::spawn(run_worker(
                    profile.clone(),
                    Arc::clone(&active),
                    Arc::clone(&cooldown),
                    Arc::clone(&launcher),
                    Arc::clone(&queue_rx),
                    clock.clone(),
                    Arc::clone(&log),
                ))
            })
            .collect();

        let (gc_shutdown, gc_shutdown_rx) = watch::channel(false);
        let gc_task = tokio::spawn(run_cooldown_gc(
            Duration::from_secs(profile.polling_interval_seconds),
            profile.cooldown_horizon(),
            Arc::clone(&cooldown),
            clock.clone(),
            gc_shutdown_rx,
        ));

        Self {
            profile,
            clock,
            active,
            cooldown,
            launcher,
            running: Some(Running {
                watcher,
                admission_task,
                workers,
                queue_tx,
                gc_shutdown,
                gc_task,
            }),
        }
    }

    pub fn profile(&self) -> &WatchProfile {
        &self.profile
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_none()
    }

    /// Operator-initiated scan, bypassing cooldown (spec §4.A).
    pub async fn manual_scan(&self, log: &dyn LogAppender) -> Result<usize, EngineError> {
        let Some(running) = &self.running else {
            return Ok(0);
        };
        let candidates = fb_watch::manual_scan(&self.profile.watch_directory)?;
        let mut admitted = 0usize;
        for candidate in candidates {
            let outcome = admission::admit(
                &self.profile,
                &candidate,
                &self.active,
                &self.cooldown,
                &running.queue_tx,
                self.clock.now_utc(),
                true,
                log,
            )
            .await;
            if outcome.is_admitted() {
                admitted += 1;
            }
        }
        Ok(admitted)
    }

    /// Stop signals: close the work channel so workers drain, stop the
    /// watcher, wait up to 5 s, then force-terminate any remaining
    /// children (spec §5).
    pub async fn stop(mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        running.watcher.stop().await;
        let _ = running.admission_task.await;
        drop(running.queue_tx);
        let _ = running.gc_shutdown.send(true);
        let _ = running.gc_task.await;

        let drain = tokio::time::timeout(WORKER_DRAIN_TIMEOUT, futures_join_all(running.workers));
        if drain.await.is_err() {
            tracing::warn!(profile = %self.profile.name, "worker drain timed out");
        }

        self.launcher.shutdown().await;
    }
}

async fn futures_join_all(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        let _ = handle.await;
    }
}

async fn run_admission_loop(
    profile: WatchProfile,
    active: Arc<ActiveFileSet>,
    cooldown: Arc<CooldownMap>,
    queue_tx: WorkSender,
    clock: impl Clock,
    log: Arc<dyn LogAppender>,
    mut candidate_rx: tokio::sync::mpsc::Receiver<FileEvent>,
) {
    while let Some(event) = candidate_rx.recv().await {
        let _ = admission::admit(
            &profile,
            &event.file_path,
            &active,
            &cooldown,
            &queue_tx,
            clock.now_utc(),
            false,
            log.as_ref(),
        )
        .await;
    }
}

async fn run_worker(
    profile: WatchProfile,
    active: Arc<ActiveFileSet>,
    cooldown: Arc<CooldownMap>,
    launcher: Arc<Launcher>,
    queue_rx: Arc<AsyncMutex<queue::WorkReceiver>>,
    clock: impl Clock,
    log: Arc<dyn LogAppender>,
) {
    loop {
        let target = {
            let mut guard = queue_rx.lock().await;
            guard.recv().await
        };
        let Some(target) = target else {
            break;
        };

        match readiness::check_readiness(&profile, &target).await {
            ReadinessOutcome::Ready => {
                let now = clock.now_utc();
                let _ = log
                    .append(
                        LogKind::FileEvent,
                        format!("{} passed readiness, dispatching", target.display()),
                        None,
                    )
                    .await;
                let event = FileEvent::new(target.clone(), EventKind::Created, DetectionSource::WorkQueue, now);
                launcher.launch(&profile, &event, Arc::clone(&log)).await;
                cooldown.record(target.clone(), now);
            }
            ReadinessOutcome::Missing => {
                // No log, no cooldown (spec §4.D.1).
            }
            ReadinessOutcome::Locked => {
                tracing::debug!(target = %target.display(), "target locked, will retry");
            }
            ReadinessOutcome::UnstableTimeout => {
                tracing::warn!(target = %target.display(), "size never stabilized within 30s");
            }
        }

        active.remove(&target);
    }
}

/// Sweep `cooldown` once per polling tick, dropping entries older than
/// `2 * horizon` (spec §3 `CooldownMap`). Runs alongside the rescan
/// rather than off the candidate stream, since an empty or inactive
/// watch directory produces no candidates to piggyback the sweep on.
async fn run_cooldown_gc(
    polling_interval: Duration,
    horizon: chrono::Duration,
    cooldown: Arc<CooldownMap>,
    clock: impl Clock,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(polling_interval) => {}
            _ = shutdown.changed() => break,
        }
        if *shutdown.borrow() {
            break;
        }
        cooldown.garbage_collect(clock.now_utc(), horizon);
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
