// SPDX-License-Identifier: MIT

//! `RunningProcessSet` (spec §3): mapping from OS pid to the means of
//! terminating that child, plus start metadata. Entries are inserted
//! when a child starts and removed in its exit callback.
//!
//! The launcher owns each `tokio::process::Child` directly inside its
//! own watcher task so `wait()` and a forced `start_kill()` can race in
//! a single `tokio::select!` without sharing the handle across tasks;
//! this set instead holds a one-shot "please terminate" signal per pid,
//! which is the termination mechanism profile shutdown actually needs.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use tokio::sync::oneshot;

pub struct RunningProcessSet {
    entries: Mutex<HashMap<u32, Entry>>,
}

struct Entry {
    kill: oneshot::Sender<()>,
    #[allow(dead_code)]
    started_at: DateTime<Utc>,
}

impl Default for RunningProcessSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RunningProcessSet {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn insert(&self, pid: u32, kill: oneshot::Sender<()>, started_at: DateTime<Utc>) {
        self.entries.lock().insert(pid, Entry { kill, started_at });
    }

    pub fn remove(&self, pid: u32) {
        self.entries.lock().remove(&pid);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain every entry, firing its kill signal. The caller is
    /// responsible for awaiting the corresponding watcher tasks so the
    /// termination is synchronous before shutdown returns (spec §4.E
    /// "Shutdown").
    pub fn signal_all(&self) {
        let entries = std::mem::take(&mut *self.entries.lock());
        for (_, entry) in entries {
            let _ = entry.kill.send(());
        }
    }
}

#[cfg(test)]
#[path = "running_tests.rs"]
mod tests;
