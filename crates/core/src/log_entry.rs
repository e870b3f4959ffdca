// SPDX-License-Identifier: MIT

//! Log entry taxonomy (spec §7) and the persisted entry shape (spec §6).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The four log kinds from spec §7. Serialized as the `logType` field
/// using lower camel-case string tags so on-disk logs read naturally
/// next to `id`/`timestamp`/`message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogKind {
    /// Informational arrival/admission.
    FileEvent,
    /// Informational spawn success, including normal exits.
    ProcessLaunch,
    /// Configuration errors, spawn failure, non-zero exit, child stderr.
    ProcessError,
    /// I/O or notification failures in the watcher, readiness gate, or
    /// polling loop.
    WatcherError,
}

/// One entry in the durable, rotating log (spec §3, §4.F, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "logType")]
    pub log_type: LogKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl LogEntry {
    pub fn new(id: u64, timestamp: DateTime<Utc>, log_type: LogKind, message: impl Into<String>) -> Self {
        Self {
            id,
            timestamp,
            log_type,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[cfg(test)]
#[path = "log_entry_tests.rs"]
mod tests;
