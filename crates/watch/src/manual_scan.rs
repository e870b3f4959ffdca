// SPDX-License-Identifier: MIT

//! Manual scan (spec §4.A): a synchronous directory enumeration used by
//! the operator-initiated "scan now" operation.
//!
//! This module only discovers paths — running each one through
//! admission (with the cooldown check disabled) and counting
//! successes is `fb-engine`'s job, since only the engine holds the
//! `ActiveFileSet`/`CooldownMap` state the admission filter needs.

use crate::WatcherError;
use std::path::{Path, PathBuf};

/// Enumerate every regular file directly inside `directory`
/// (non-recursive), in directory-iteration order.
pub fn manual_scan(directory: &Path) -> Result<Vec<PathBuf>, WatcherError> {
    let entries = std::fs::read_dir(directory).map_err(|source| WatcherError::Enumerate {
        path: directory.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries.flatten() {
        if entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            paths.push(entry.path());
        }
    }
    Ok(paths)
}

#[cfg(test)]
#[path = "manual_scan_tests.rs"]
mod tests;
