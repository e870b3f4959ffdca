// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fb-config: loads the JSON configuration document described in spec §6.
//!
//! This crate is deliberately separate from `fb-engine`: the core engine
//! only ever sees validated `fb_core::WatchProfile` values, never raw
//! JSON. A malformed document still installs every profile that parses
//! and validates cleanly — one bad entry in `Apps` does not take down
//! the rest, matching the "configuration errors ... leave the profile
//! idle, non-fatal to siblings" policy from spec §7 applied at load
//! time as well as at install time.

mod raw;

use fb_core::{ProfileError, WatchProfile, WatchProfileBuilder};
use std::path::Path;
use thiserror::Error;

pub use raw::{RawAppConfig, RawConfigDocument};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One profile entry that failed validation, kept alongside the
/// successfully-loaded profiles so the daemon can log it and continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileLoadError {
    pub name: String,
    pub error: ProfileError,
}

/// Global, non-per-profile settings (spec §6 defaults:
/// `LogDirectory`, `LogRetentionDays`, `MaxLogsPerFile`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSinkSettings {
    pub log_directory: String,
    pub log_retention_days: u32,
    pub max_logs_per_file: u32,
}

/// The fully-loaded, partially-validated configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub log_sink: LogSinkSettings,
    pub profiles: Vec<WatchProfile>,
    pub errors: Vec<ProfileLoadError>,
}

/// Load and validate the configuration file at `path`.
///
/// I/O and JSON-syntax errors are fatal (the document itself could not
/// be read). Per-profile validation errors are not: they are collected
/// into `LoadedConfig::errors` and the remaining profiles still load.
pub fn load_from_path(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Load and validate a configuration document already in memory (used
/// by `load_from_path` and directly by tests).
pub fn load_from_str(text: &str) -> Result<LoadedConfig, serde_json::Error> {
    let raw: RawConfigDocument = serde_json::from_str(text)?;
    Ok(load_from_raw(raw))
}

fn load_from_raw(raw: RawConfigDocument) -> LoadedConfig {
    let log_sink = LogSinkSettings {
        log_directory: raw.log_directory(),
        log_retention_days: raw.log_retention_days(),
        max_logs_per_file: raw.max_logs_per_file(),
    };

    let mut profiles = Vec::new();
    let mut errors = Vec::new();
    for app in raw.apps {
        let name = app.name.clone();
        match build_profile(app) {
            Ok(profile) => profiles.push(profile),
            Err(error) => errors.push(ProfileLoadError { name, error }),
        }
    }

    LoadedConfig {
        log_sink,
        profiles,
        errors,
    }
}

fn build_profile(app: RawAppConfig) -> Result<WatchProfile, ProfileError> {
    let mut builder = WatchProfileBuilder::new(app.name, app.watch_directory)
        .executable_path(app.executable_path)
        .arguments(app.arguments)
        .ignore_extensions(app.ignore_extensions)
        .marker_file_patterns(app.marker_file_patterns);

    if let Some(v) = app.polling_interval_seconds {
        builder = builder.polling_interval_seconds(v);
    }
    if let Some(v) = app.size_check_interval_ms {
        builder = builder.size_check_interval_ms(v);
    }
    if let Some(v) = app.size_stability_check_count {
        builder = builder.size_stability_check_count(v);
    }
    if let Some(v) = app.max_concurrent_processes {
        builder = builder.max_concurrent_processes(v);
    }

    builder.build()
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
