// SPDX-License-Identifier: MIT

//! `WatchProfile`: the unit of configuration (spec §3).
//!
//! A profile is immutable once installed — reconfiguration is always
//! delete-then-add at the Config Manager layer, never in-place mutation
//! here.

use std::collections::BTreeSet;
use std::path::PathBuf;

/// One independent (directory -> executable) configuration instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchProfile {
    pub name: String,
    pub watch_directory: PathBuf,
    pub polling_interval_seconds: u64,
    pub executable_path: PathBuf,
    pub arguments: String,
    pub ignore_extensions: BTreeSet<String>,
    pub marker_file_patterns: Vec<String>,
    pub size_check_interval_ms: u64,
    pub size_stability_check_count: u32,
    pub max_concurrent_processes: usize,
}

/// Error raised when a `WatchProfile` cannot be constructed from raw
/// values (used by `fb-config` at load time and directly by callers
/// building profiles programmatically).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("profile name must not be empty")]
    EmptyName,
    #[error("watchDirectory must not be empty")]
    EmptyWatchDirectory,
    #[error("pollingIntervalSeconds must be >= 1, got {0}")]
    InvalidPollingInterval(u64),
    #[error("marker pattern '{0}' must have the shape *.SUFFIX")]
    InvalidMarkerPattern(String),
}

/// Builds a [`WatchProfile`], applying the §6 defaults for fields left
/// unset and validating on [`build`](WatchProfileBuilder::build).
#[derive(Debug, Clone, Default)]
pub struct WatchProfileBuilder {
    name: Option<String>,
    watch_directory: Option<PathBuf>,
    polling_interval_seconds: Option<u64>,
    executable_path: Option<PathBuf>,
    arguments: Option<String>,
    ignore_extensions: Vec<String>,
    marker_file_patterns: Vec<String>,
    size_check_interval_ms: Option<u64>,
    size_stability_check_count: Option<u32>,
    max_concurrent_processes: Option<usize>,
}

/// Default rescan cadence, seconds (spec §6).
pub const DEFAULT_POLLING_INTERVAL_SECONDS: u64 = 30;
/// Default size-probe cadence, milliseconds (spec §6).
pub const DEFAULT_SIZE_CHECK_INTERVAL_MS: u64 = 100;
/// Default number of consecutive equal-size samples required (spec §6).
pub const DEFAULT_SIZE_STABILITY_CHECK_COUNT: u32 = 2;
/// Default concurrency bound; 0 means unbounded (spec §6).
pub const DEFAULT_MAX_CONCURRENT_PROCESSES: usize = 0;

impl WatchProfileBuilder {
    pub fn new(name: impl Into<String>, watch_directory: impl Into<PathBuf>) -> Self {
        Self {
            name: Some(name.into()),
            watch_directory: Some(watch_directory.into()),
            ..Default::default()
        }
    }

    pub fn polling_interval_seconds(mut self, seconds: u64) -> Self {
        self.polling_interval_seconds = Some(seconds);
        self
    }

    pub fn executable_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable_path = Some(path.into());
        self
    }

    pub fn arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = Some(arguments.into());
        self
    }

    pub fn ignore_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn marker_file_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.marker_file_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn size_check_interval_ms(mut self, ms: u64) -> Self {
        self.size_check_interval_ms = Some(ms);
        self
    }

    pub fn size_stability_check_count(mut self, count: u32) -> Self {
        self.size_stability_check_count = Some(count);
        self
    }

    pub fn max_concurrent_processes(mut self, count: usize) -> Self {
        self.max_concurrent_processes = Some(count);
        self
    }

    pub fn build(self) -> Result<WatchProfile, ProfileError> {
        let name = self.name.unwrap_or_default();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        let watch_directory = self.watch_directory.unwrap_or_default();
        if watch_directory.as_os_str().is_empty() {
            return Err(ProfileError::EmptyWatchDirectory);
        }
        let polling_interval_seconds = self
            .polling_interval_seconds
            .unwrap_or(DEFAULT_POLLING_INTERVAL_SECONDS);
        if polling_interval_seconds < 1 {
            return Err(ProfileError::InvalidPollingInterval(
                polling_interval_seconds,
            ));
        }
        let ignore_extensions = self
            .ignore_extensions
            .iter()
            .map(|ext| normalize_extension(ext))
            .collect();

        for pattern in &self.marker_file_patterns {
            validate_marker_pattern(pattern)?;
        }

        Ok(WatchProfile {
            name,
            watch_directory,
            polling_interval_seconds,
            executable_path: self.executable_path.unwrap_or_default(),
            arguments: self.arguments.unwrap_or_default(),
            ignore_extensions,
            marker_file_patterns: self.marker_file_patterns,
            size_check_interval_ms: self
                .size_check_interval_ms
                .unwrap_or(DEFAULT_SIZE_CHECK_INTERVAL_MS),
            size_stability_check_count: self
                .size_stability_check_count
                .unwrap_or(DEFAULT_SIZE_STABILITY_CHECK_COUNT),
            max_concurrent_processes: self
                .max_concurrent_processes
                .unwrap_or(DEFAULT_MAX_CONCURRENT_PROCESSES),
        })
    }
}

/// Lower-cases and dot-prefixes a user-supplied ignore extension so
/// `"tmp"`, `".tmp"`, and `".TMP"` are all stored as `.tmp`.
fn normalize_extension(ext: &str) -> String {
    let lower = ext.to_ascii_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{lower}")
    }
}

fn validate_marker_pattern(pattern: &str) -> Result<(), ProfileError> {
    if !pattern.starts_with("*.") || pattern.len() < 3 {
        return Err(ProfileError::InvalidMarkerPattern(pattern.to_string()));
    }
    Ok(())
}

impl WatchProfile {
    /// The marker suffix is everything after the leading `*`, e.g.
    /// `*.ready` -> `.ready`. Used by the admission filter to strip the
    /// marker suffix off a candidate's basename and derive the target.
    pub fn marker_suffixes(&self) -> impl Iterator<Item = &str> {
        self.marker_file_patterns.iter().map(|p| &p[1..])
    }

    pub fn worker_pool_size(&self) -> usize {
        std::cmp::max(2, self.max_concurrent_processes)
    }

    /// Cooldown horizon per spec §3: `max(pollingIntervalSeconds * 2, 60s)`.
    pub fn cooldown_horizon(&self) -> chrono::Duration {
        let doubled = self.polling_interval_seconds.saturating_mul(2);
        chrono::Duration::seconds(std::cmp::max(doubled, 60) as i64)
    }
}

#[cfg(test)]
#[path = "profile_tests.rs"]
mod tests;
