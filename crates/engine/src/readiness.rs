// SPDX-License-Identifier: MIT

//! Readiness gate (component D, spec §4.D): existence, lock probe, and
//! size-stability sampling, run inside each worker before dispatch.

use fb_core::WatchProfile;
use fs2::FileExt;
use std::path::Path;
use std::time::Duration;
use tokio::time::Instant;

/// Hard ceiling on size-stability sampling (spec §4.D, §5).
const STABILITY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessOutcome {
    /// Existence, lock, and stability all passed.
    Ready,
    /// `t` no longer exists; no log, no cooldown (spec §4.D.1).
    Missing,
    /// Sharing violation on open; retryable, no cooldown.
    Locked,
    /// Size never stabilized within the hard ceiling; retryable.
    UnstableTimeout,
}

/// Run the gate for `target`. Never blocks the caller longer than the
/// 30 s stability ceiling.
pub async fn check_readiness(profile: &WatchProfile, target: &Path) -> ReadinessOutcome {
    if !target.is_file() {
        return ReadinessOutcome::Missing;
    }

    if probe_locked(target) {
        return ReadinessOutcome::Locked;
    }

    if profile.size_check_interval_ms == 0 || profile.size_stability_check_count == 0 {
        return ReadinessOutcome::Ready;
    }

    sample_until_stable(profile, target).await
}

/// Step 2: open for read, attempt a non-blocking exclusive lock. A
/// sharing violation means something else holds the file open for
/// writing; any other open/lock failure is treated as "not locked" so
/// a transient, unrelated I/O hiccup doesn't wedge the gate forever.
fn probe_locked(target: &Path) -> bool {
    let file = match std::fs::File::open(target) {
        Ok(file) => file,
        Err(_) => return false,
    };
    match file.try_lock_exclusive() {
        Ok(()) => {
            let _ = FileExt::unlock(&file);
            false
        }
        Err(error) if error.kind() == std::io::ErrorKind::WouldBlock => true,
        Err(_) => false,
    }
}

/// Step 3: sample `size(target)` every `sizeCheckIntervalMs`, counting
/// consecutive equal samples, until `sizeStabilityCheckCount` is
/// reached or the 30 s ceiling elapses.
async fn sample_until_stable(profile: &WatchProfile, target: &Path) -> ReadinessOutcome {
    let interval = Duration::from_millis(profile.size_check_interval_ms);
    let deadline = Instant::now() + STABILITY_TIMEOUT;
    let mut consecutive: u32 = 0;
    let mut last_size: Option<u64> = None;

    loop {
        if Instant::now() >= deadline {
            return ReadinessOutcome::UnstableTimeout;
        }

        let size = match std::fs::metadata(target) {
            Ok(meta) => meta.len(),
            Err(_) => return ReadinessOutcome::Missing,
        };

        consecutive = match last_size {
            Some(previous) if previous == size => consecutive + 1,
            _ => 1,
        };
        last_size = Some(size);

        if consecutive >= profile.size_stability_check_count {
            return ReadinessOutcome::Ready;
        }

        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
#[path = "readiness_tests.rs"]
mod tests;
