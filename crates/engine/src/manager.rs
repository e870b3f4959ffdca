// SPDX-License-Identifier: MIT

//! Config Manager (SPEC_FULL.md §4.H): owns the map from profile name
//! to its running [`ProfilePipeline`], plus the single shared log sink.
//! Profiles are immutable once installed (spec §3) — reconfigure is
//! remove-then-install, never in-place mutation.

use crate::pipeline::ProfilePipeline;
use crate::EngineError;
use fb_core::{Clock, SystemClock, WatchProfile};
use fb_storage::LogAppender;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// `tokio::sync::Mutex` rather than `parking_lot` here: `manual_scan`
/// needs to hold the map lock across an `.await` while it calls into
/// the looked-up pipeline, which an async-aware mutex is built for.
pub struct ConfigManager<C: Clock = SystemClock> {
    clock: C,
    log: Arc<dyn LogAppender>,
    pipelines: Mutex<HashMap<String, ProfilePipeline<C>>>,
}

impl<C: Clock> ConfigManager<C> {
    pub fn new(log: Arc<dyn LogAppender>, clock: C) -> Self {
        Self {
            clock,
            log,
            pipelines: Mutex::new(HashMap::new()),
        }
    }

    /// Start a new profile's pipeline. Rejects a duplicate name; the
    /// caller must `remove` first to reconfigure (profiles are
    /// immutable once installed, spec §3).
    pub async fn install(&self, profile: WatchProfile) -> Result<(), EngineError> {
        let name = profile.name.clone();
        let mut pipelines = self.pipelines.lock().await;
        if pipelines.contains_key(&name) {
            return Err(EngineError::AlreadyInstalled(name));
        }
        let pipeline = ProfilePipeline::start(profile, Arc::clone(&self.log), self.clock.clone()).await;
        pipelines.insert(name, pipeline);
        Ok(())
    }

    /// Clean teardown of an installed profile (spec §5 cancellation
    /// rules): workers drain, watcher stops, remaining children are
    /// force-terminated.
    pub async fn remove(&self, name: &str) -> Result<(), EngineError> {
        let pipeline = self
            .pipelines
            .lock()
            .await
            .remove(name)
            .ok_or_else(|| EngineError::NotInstalled(name.to_string()))?;
        pipeline.stop().await;
        Ok(())
    }

    pub async fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.pipelines.lock().await.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn is_installed(&self, name: &str) -> bool {
        self.pipelines.lock().await.contains_key(name)
    }

    /// Operator-initiated manual scan (spec §4.A, §6): bypasses
    /// cooldown, returns the number of files admitted.
    pub async fn manual_scan(&self, name: &str) -> Result<usize, EngineError> {
        let pipelines = self.pipelines.lock().await;
        let pipeline = pipelines
            .get(name)
            .ok_or_else(|| EngineError::NotInstalled(name.to_string()))?;
        pipeline.manual_scan(self.log.as_ref()).await
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
