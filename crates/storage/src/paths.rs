// SPDX-License-Identifier: MIT

//! Log file naming: `filebridge_monitor_YYYYMMDD.json` for a date's
//! first file, `filebridge_monitor_YYYYMMDD_NNNN.json` for overflow
//! files (spec §4.F / §6).

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub const FILE_PREFIX: &str = "filebridge_monitor_";

/// File number 1 is the bare `filebridge_monitor_YYYYMMDD.json`; file
/// numbers 2+ get a 4-digit suffix.
pub fn log_file_name(date: NaiveDate, file_number: u32) -> String {
    let date_str = date.format("%Y%m%d");
    if file_number <= 1 {
        format!("{FILE_PREFIX}{date_str}.json")
    } else {
        format!("{FILE_PREFIX}{date_str}_{file_number:04}.json")
    }
}

pub fn log_file_path(log_dir: &Path, date: NaiveDate, file_number: u32) -> PathBuf {
    log_dir.join(log_file_name(date, file_number))
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
