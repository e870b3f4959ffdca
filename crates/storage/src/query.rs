// SPDX-License-Identifier: MIT

//! Retrieval over the durable log: filter by date range and/or
//! [`LogKind`], paginate newest-first (spec §4.F).

use crate::paths::FILE_PREFIX;
use crate::retention::parse_date_from_filename;
use chrono::NaiveDate;
use fb_core::{LogEntry, LogKind};
use std::path::Path;

/// A retrieval request. `None` bounds are unbounded on that side.
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub kind: Option<LogKind>,
    pub offset: usize,
    pub limit: usize,
}

impl LogQuery {
    pub fn new() -> Self {
        Self {
            offset: 0,
            limit: usize::MAX,
            ..Default::default()
        }
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from_date = from;
        self.to_date = to;
        self
    }

    pub fn with_kind(mut self, kind: LogKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    fn matches_date(&self, date: NaiveDate) -> bool {
        self.from_date.map_or(true, |from| date >= from) && self.to_date.map_or(true, |to| date <= to)
    }

    fn matches_kind(&self, entry: &LogEntry) -> bool {
        self.kind.map(|kind| kind == entry.log_type).unwrap_or(true)
    }
}

/// A page of query results plus the total number of matches across the
/// whole (unpaginated) result set.
#[derive(Debug, Clone, Default)]
pub struct LogPage {
    pub entries: Vec<LogEntry>,
    pub total: usize,
}

/// Run `query` against every log file under `log_dir`. Any file that
/// fails to read or parse is skipped rather than failing the whole
/// query (spec §4.F: retrieval degrades gracefully around a damaged
/// file rather than refusing to serve the rest of the log).
pub fn run_query(log_dir: &Path, query: &LogQuery) -> LogPage {
    let mut matched: Vec<LogEntry> = Vec::new();

    let Ok(read_dir) = std::fs::read_dir(log_dir) else {
        return LogPage::default();
    };

    let mut candidate_dates: Vec<(NaiveDate, std::path::PathBuf)> = read_dir
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            if !name.starts_with(FILE_PREFIX) {
                return None;
            }
            let date = parse_date_from_filename(&name)?;
            Some((date, entry.path()))
        })
        .filter(|(date, _)| query.matches_date(*date))
        .collect();

    // Stable ordering independent of directory iteration order so two
    // runs over the same files produce the same page.
    candidate_dates.sort_by(|a, b| a.1.cmp(&b.1));

    for (_, path) in candidate_dates {
        let Ok(bytes) = std::fs::read(&path) else {
            tracing::warn!(path = %path.display(), "skipping unreadable log file in query");
            continue;
        };
        let entries: Vec<LogEntry> = match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "skipping unparseable log file in query");
                continue;
            }
        };
        matched.extend(entries.into_iter().filter(|entry| query.matches_kind(entry)));
    }

    // Newest first; ties (same timestamp) break by id, which is
    // monotonically assigned in append order.
    matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));

    let total = matched.len();
    let entries = matched.into_iter().skip(query.offset).take(query.limit).collect();

    LogPage { entries, total }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
