// SPDX-License-Identifier: MIT

//! Work queue (component C, spec §4.C): a bounded FIFO buffer between
//! admission and the worker pool. Admission uses the non-blocking
//! producer variant; the "wait on full" variant exists for the
//! otherwise-unused caller described in §4.C/§5 and for tests.

use std::path::PathBuf;
use tokio::sync::mpsc;

/// Capacity of the work channel (spec §4.C, §5).
pub const QUEUE_CAPACITY: usize = 1000;

pub fn channel() -> (WorkSender, WorkReceiver) {
    let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
    (WorkSender { inner: tx }, WorkReceiver { inner: rx })
}

#[derive(Clone)]
pub struct WorkSender {
    inner: mpsc::Sender<PathBuf>,
}

/// Why a non-blocking enqueue attempt didn't succeed.
#[derive(Debug, PartialEq, Eq)]
pub enum TrySendOutcome {
    Sent,
    Full,
    Closed,
}

impl WorkSender {
    /// Admission's enqueue variant (spec §4.B step 7): never blocks.
    pub fn try_send(&self, target: PathBuf) -> TrySendOutcome {
        match self.inner.try_send(target) {
            Ok(()) => TrySendOutcome::Sent,
            Err(mpsc::error::TrySendError::Full(_)) => TrySendOutcome::Full,
            Err(mpsc::error::TrySendError::Closed(_)) => TrySendOutcome::Closed,
        }
    }

    /// The "wait on full" producer variant named in spec §4.C, used by
    /// the manual-scan path and by tests that want to assert
    /// back-pressure deterministically rather than retry on `Full`.
    pub async fn send(&self, target: PathBuf) -> Result<(), mpsc::error::SendError<PathBuf>> {
        self.inner.send(target).await
    }
}

pub struct WorkReceiver {
    inner: mpsc::Receiver<PathBuf>,
}

impl WorkReceiver {
    pub async fn recv(&mut self) -> Option<PathBuf> {
        self.inner.recv().await
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
