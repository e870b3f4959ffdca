// SPDX-License-Identifier: MIT

//! `ActiveFileSet` (spec §3): the set of absolute paths currently
//! queued or being processed. Insertion is test-and-set; removal
//! happens exactly once, in a worker's finalization step.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct ActiveFileSet {
    paths: Mutex<HashSet<PathBuf>>,
}

impl ActiveFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically insert `path` if absent. Returns `true` if this call
    /// won the insertion race, `false` if `path` was already active.
    pub fn try_insert(&self, path: PathBuf) -> bool {
        self.paths.lock().insert(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.lock().contains(path)
    }

    /// Remove `path`. Safe to call even if `path` isn't present (e.g. a
    /// worker finalizer running after a prior removal raced it).
    pub fn remove(&self, path: &Path) {
        self.paths.lock().remove(path);
    }

    pub fn len(&self) -> usize {
        self.paths.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "active_set_tests.rs"]
mod tests;
