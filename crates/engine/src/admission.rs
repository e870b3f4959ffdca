// SPDX-License-Identifier: MIT

//! Admission filter (component B, spec §4.B): the 7-step pipeline that
//! turns a raw candidate path into an admitted target, or rejects it.

use crate::active_set::ActiveFileSet;
use crate::cooldown::CooldownMap;
use crate::queue::{TrySendOutcome, WorkSender};
use chrono::{DateTime, Utc};
use fb_core::{LogKind, WatchProfile};
use fb_storage::LogAppender;
use std::path::{Path, PathBuf};

/// Why a candidate was rejected, for tests and diagnostics. Production
/// code only needs to know admit-or-not; the taxonomy exists so tests
/// can assert *which* step rejected a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionOutcome {
    Admitted(PathBuf),
    NotAFileOrMissing,
    IgnoredExtension,
    NoMarkerMatch,
    AlreadyActive,
    InCooldown,
    QueueFull,
    QueueClosed,
}

impl AdmissionOutcome {
    pub fn is_admitted(&self) -> bool {
        matches!(self, AdmissionOutcome::Admitted(_))
    }
}

/// Run `candidate` through the 7-step pipeline. `bypass_cooldown` is
/// set by the manual-scan path (spec §3 invariant 4, §4.A).
pub async fn admit(
    profile: &WatchProfile,
    candidate: &Path,
    active: &ActiveFileSet,
    cooldown: &CooldownMap,
    queue: &WorkSender,
    now: DateTime<Utc>,
    bypass_cooldown: bool,
    log: &dyn LogAppender,
) -> AdmissionOutcome {
    let is_marker_shaped = is_marker_shaped(profile, candidate);

    // Step 1: directory or missing, unless it looks like a marker
    // (whose own existence is re-checked when the target is derived).
    if !is_marker_shaped && !candidate.is_file() {
        return AdmissionOutcome::NotAFileOrMissing;
    }
    if candidate.is_dir() {
        return AdmissionOutcome::NotAFileOrMissing;
    }

    // Step 2: ignore-extension test is against the *candidate's*
    // basename, before marker resolution derives a different target.
    if is_ignored_extension(profile, candidate) {
        return AdmissionOutcome::IgnoredExtension;
    }

    // Step 3: marker resolution.
    let target = match resolve_target(profile, candidate) {
        Some(target) => target,
        None => return AdmissionOutcome::NoMarkerMatch,
    };

    // Step 4.
    if active.contains(&target) {
        return AdmissionOutcome::AlreadyActive;
    }

    // Step 5.
    if !bypass_cooldown && cooldown.is_in_cooldown(&target, now, profile.cooldown_horizon()) {
        return AdmissionOutcome::InCooldown;
    }

    // Step 6.
    if !active.try_insert(target.clone()) {
        return AdmissionOutcome::AlreadyActive;
    }

    // Step 7.
    match queue.try_send(target.clone()) {
        TrySendOutcome::Sent => AdmissionOutcome::Admitted(target),
        TrySendOutcome::Full => {
            active.remove(&target);
            let _ = log
                .append(
                    LogKind::WatcherError,
                    format!("work queue full, dropping candidate {}", target.display()),
                    None,
                )
                .await;
            AdmissionOutcome::QueueFull
        }
        TrySendOutcome::Closed => {
            active.remove(&target);
            AdmissionOutcome::QueueClosed
        }
    }
}

fn is_ignored_extension(profile: &WatchProfile, path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let lower = name.to_ascii_lowercase();
    profile.ignore_extensions.iter().any(|ext| lower.ends_with(ext.as_str()))
}

fn is_marker_shaped(profile: &WatchProfile, candidate: &Path) -> bool {
    if profile.marker_file_patterns.is_empty() {
        return false;
    }
    let Some(name) = candidate.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    profile.marker_suffixes().any(|suffix| {
        name.strip_suffix(suffix)
            .map(|stripped| !stripped.is_empty())
            .unwrap_or(false)
    })
}

/// Step 3: if `markerFilePatterns` is non-empty, `candidate` must match
/// one of them and its derived target must exist. Otherwise the target
/// is the candidate itself.
fn resolve_target(profile: &WatchProfile, candidate: &Path) -> Option<PathBuf> {
    if profile.marker_file_patterns.is_empty() {
        return Some(candidate.to_path_buf());
    }

    let name = candidate.file_name()?.to_str()?;
    for suffix in profile.marker_suffixes() {
        if let Some(stripped) = name.strip_suffix(suffix) {
            if stripped.is_empty() {
                continue;
            }
            let target = candidate.with_file_name(stripped);
            if target.is_file() {
                return Some(target);
            }
        }
    }
    None
}

#[cfg(test)]
#[path = "admission_tests.rs"]
mod tests;
