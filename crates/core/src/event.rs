// SPDX-License-Identifier: MIT

//! File events produced by the watcher and carried through the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What happened to a path.
///
/// Per the resolved design ambiguity in spec §9(b): `Deleted` is
/// tracked for diagnostics but never drives a launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Created,
    Changed,
    Deleted,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Created => "Created",
            EventKind::Changed => "Changed",
            EventKind::Deleted => "Deleted",
        }
    }
}

/// How a candidate path was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionSource {
    /// Raised by the OS filesystem-notification API.
    FileSystemEvent,
    /// Raised by the periodic rescan timer.
    Polling,
    /// Raised by an operator-initiated manual scan.
    ManualScan,
    /// Raised by a worker after a target cleared the readiness gate,
    /// immediately before dispatch to the launcher (spec §4.D step 4
    /// calls this detection method `"WorkQueue"`).
    WorkQueue,
}

impl DetectionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionSource::FileSystemEvent => "FileSystemEvent",
            DetectionSource::Polling => "Polling",
            DetectionSource::ManualScan => "ManualScan",
            DetectionSource::WorkQueue => "WorkQueue",
        }
    }
}

/// A candidate or confirmed file event flowing through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEvent {
    pub file_path: PathBuf,
    pub event_kind: EventKind,
    pub detection_source: DetectionSource,
    pub timestamp_utc: DateTime<Utc>,
}

impl FileEvent {
    pub fn new(
        file_path: PathBuf,
        event_kind: EventKind,
        detection_source: DetectionSource,
        timestamp_utc: DateTime<Utc>,
    ) -> Self {
        Self {
            file_path,
            event_kind,
            detection_source,
            timestamp_utc,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
