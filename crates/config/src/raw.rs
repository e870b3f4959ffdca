// SPDX-License-Identifier: MIT

//! Raw (pre-validation) JSON shape of the configuration document, using
//! the exact field names from spec §6.

use serde::Deserialize;

fn default_log_directory() -> String {
    "logs".to_string()
}

const fn default_log_retention_days() -> u32 {
    30
}

const fn default_max_logs_per_file() -> u32 {
    10_000
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RawConfigDocument {
    #[serde(rename = "Apps", default)]
    pub apps: Vec<RawAppConfig>,
    #[serde(rename = "LogDirectory", default)]
    log_directory: Option<String>,
    #[serde(rename = "LogRetentionDays", default)]
    log_retention_days: Option<u32>,
    #[serde(rename = "MaxLogsPerFile", default)]
    max_logs_per_file: Option<u32>,
}

impl RawConfigDocument {
    pub fn log_directory(&self) -> String {
        self.log_directory
            .clone()
            .unwrap_or_else(default_log_directory)
    }

    pub fn log_retention_days(&self) -> u32 {
        self.log_retention_days
            .unwrap_or_else(default_log_retention_days)
    }

    pub fn max_logs_per_file(&self) -> u32 {
        self.max_logs_per_file
            .unwrap_or_else(default_max_logs_per_file)
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RawAppConfig {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "WatchDirectory", default)]
    pub watch_directory: String,
    #[serde(rename = "PollingIntervalSeconds", default)]
    pub polling_interval_seconds: Option<u64>,
    #[serde(rename = "ExecutablePath", default)]
    pub executable_path: String,
    #[serde(rename = "Arguments", default)]
    pub arguments: String,
    #[serde(rename = "IgnoreExtensions", default)]
    pub ignore_extensions: Vec<String>,
    #[serde(rename = "MarkerFilePatterns", default)]
    pub marker_file_patterns: Vec<String>,
    #[serde(rename = "SizeCheckIntervalMs", default)]
    pub size_check_interval_ms: Option<u64>,
    #[serde(rename = "SizeStabilityCheckCount", default)]
    pub size_stability_check_count: Option<u32>,
    #[serde(rename = "MaxConcurrentProcesses", default)]
    pub max_concurrent_processes: Option<usize>,
}
