// SPDX-License-Identifier: MIT

//! `CooldownMap` (spec §3): path -> UTC completion timestamp. A path
//! whose completion is newer than the profile's cooldown horizon is
//! not re-admitted outside a manual scan. Entries older than twice the
//! horizon are garbage-collected each polling tick.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct CooldownMap {
    completions: Mutex<HashMap<PathBuf, DateTime<Utc>>>,
}

impl CooldownMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, path: PathBuf, completed_at: DateTime<Utc>) {
        self.completions.lock().insert(path, completed_at);
    }

    /// `true` if `path` completed within `horizon` of `now`.
    pub fn is_in_cooldown(&self, path: &Path, now: DateTime<Utc>, horizon: Duration) -> bool {
        match self.completions.lock().get(path) {
            Some(completed_at) => now - *completed_at < horizon,
            None => false,
        }
    }

    /// Drop entries older than `2 * horizon` relative to `now`.
    pub fn garbage_collect(&self, now: DateTime<Utc>, horizon: Duration) {
        let expiry = horizon + horizon;
        self.completions
            .lock()
            .retain(|_, completed_at| now - *completed_at < expiry);
    }

    pub fn len(&self) -> usize {
        self.completions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "cooldown_tests.rs"]
mod tests;
