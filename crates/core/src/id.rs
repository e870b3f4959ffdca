// SPDX-License-Identifier: MIT

//! Log entry identifier generation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generates unique, strictly increasing `u64` ids for `LogEntry`.
///
/// Strictly increasing (not just unique) matters: retrieval's stable
/// newest-first tie-break and the rotation invariant ("entries in file
/// k+1 have insertion indices strictly greater than any in k") both
/// lean on id order tracking insertion order.
pub trait IdGen: Send + Sync {
    fn next(&self) -> u64;
}

/// Production id generator, backed by a process-wide atomic counter.
#[derive(Debug, Default)]
pub struct MonotonicIdGen {
    counter: AtomicU64,
}

impl MonotonicIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            counter: AtomicU64::new(first),
        }
    }
}

impl IdGen for MonotonicIdGen {
    fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst)
    }
}

/// Test id generator sharing a counter across clones, for assertions that
/// need to predict exact ids.
#[derive(Debug, Clone)]
pub struct SequentialIdGen {
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new() -> Self {
        Self {
            counter: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
