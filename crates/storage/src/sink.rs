// SPDX-License-Identifier: MIT

use crate::paths::{log_file_name, log_file_path, FILE_PREFIX};
use crate::retention::parse_date_from_filename;
use crate::StorageError;
use async_trait::async_trait;
use fb_core::{Clock, IdGen, LogEntry, LogKind, MonotonicIdGen, SystemClock};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// The append operation every component of the engine (A, B, E) and the
/// daemon itself writes diagnostics through. Kept as a trait so engine
/// tests can substitute [`RecordingSink`] instead of touching disk.
#[async_trait]
pub trait LogAppender: Send + Sync {
    async fn append(
        &self,
        kind: LogKind,
        message: String,
        details: Option<String>,
    ) -> Result<LogEntry, StorageError>;
}

/// Per-date buffer: the entries written to the *current* file for that
/// date, plus which file number is current.
struct DateFileState {
    entries: Vec<LogEntry>,
    file_number: u32,
}

/// An optional hook invoked after each successful append. This is the
/// integration point for an external realtime push channel (spec §6,
/// §9): the sink holds a function reference, not a back-pointer to
/// whatever subsystem is listening, which is how the cyclic-ownership
/// concern in spec §9 is broken. A subscriber failure is reported as
/// `Err` and logged, never propagated to the append caller.
pub type PostAppendCallback = Arc<dyn Fn(LogEntry) -> Result<(), String> + Send + Sync>;

/// The append-only rotating JSON log sink (component F).
pub struct LogSink<C: Clock = SystemClock> {
    log_dir: PathBuf,
    max_logs_per_file: u32,
    clock: C,
    id_gen: Arc<dyn IdGen>,
    cache: Mutex<HashMap<chrono::NaiveDate, DateFileState>>,
    on_append: Option<PostAppendCallback>,
}

impl<C: Clock> LogSink<C> {
    pub fn new(log_dir: PathBuf, max_logs_per_file: u32, clock: C) -> Self {
        Self {
            log_dir,
            max_logs_per_file,
            clock,
            id_gen: Arc::new(MonotonicIdGen::new()),
            cache: Mutex::new(HashMap::new()),
            on_append: None,
        }
    }

    pub fn with_id_gen(mut self, id_gen: Arc<dyn IdGen>) -> Self {
        self.id_gen = id_gen;
        self
    }

    pub fn with_post_append_callback(mut self, callback: PostAppendCallback) -> Self {
        self.on_append = Some(callback);
        self
    }

    pub fn log_dir(&self) -> &std::path::Path {
        &self.log_dir
    }

    /// Drop the buffered entries for `date`, if any. Called by the
    /// retention sweep after it deletes that date's file on disk, so a
    /// deleted date's stale entries can't linger in memory and leak
    /// back out through a later query or append (spec §4.F).
    pub fn evict_cache(&self, date: chrono::NaiveDate) {
        self.cache.lock().remove(&date);
    }

    /// Load (or initialize) the cache entry for `date`, discovering the
    /// current file number and its buffered entries from disk the first
    /// time a given date is touched in this process.
    fn load_or_init(&self, date: chrono::NaiveDate) -> DateFileState {
        let max_existing = fs::read_dir(&self.log_dir)
            .into_iter()
            .flatten()
            .flatten()
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(FILE_PREFIX))
            .filter_map(|name| {
                let parsed_date = parse_date_from_filename(&name)?;
                if parsed_date != date {
                    return None;
                }
                Some(file_number_from_name(&name))
            })
            .max()
            .unwrap_or(1);

        let path = log_file_path(&self.log_dir, date, max_existing);
        let entries = read_entries(&path).unwrap_or_default();
        DateFileState {
            entries,
            file_number: max_existing,
        }
    }

    fn write_current_file(
        &self,
        date: chrono::NaiveDate,
        state: &DateFileState,
    ) -> Result<(), StorageError> {
        fs::create_dir_all(&self.log_dir).map_err(|source| StorageError::Write {
            path: self.log_dir.clone(),
            source,
        })?;
        let path = log_file_path(&self.log_dir, date, state.file_number);
        let json = serde_json::to_vec_pretty(&state.entries)?;

        let tmp_path = path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp_path).map_err(|source| StorageError::Write {
                path: tmp_path.clone(),
                source,
            })?;
            file.write_all(&json).map_err(|source| StorageError::Write {
                path: tmp_path.clone(),
                source,
            })?;
            file.sync_all().map_err(|source| StorageError::Write {
                path: tmp_path.clone(),
                source,
            })?;
        }
        fs::rename(&tmp_path, &path).map_err(|source| StorageError::Write { path, source })?;
        Ok(())
    }
}

#[async_trait]
impl<C: Clock> LogAppender for LogSink<C> {
    async fn append(
        &self,
        kind: LogKind,
        message: String,
        details: Option<String>,
    ) -> Result<LogEntry, StorageError> {
        let now = self.clock.now_utc();
        let date = now.date_naive();
        let id = self.id_gen.next();
        let mut entry = LogEntry::new(id, now, kind, message);
        entry.details = details;

        let result = {
            let mut cache = self.cache.lock();
            let mut state = cache.remove(&date).unwrap_or_else(|| self.load_or_init(date));

            let at_capacity =
                self.max_logs_per_file > 0 && state.entries.len() as u32 >= self.max_logs_per_file;
            if at_capacity {
                state.file_number += 1;
                state.entries.clear();
            }
            state.entries.push(entry.clone());

            let write_result = self.write_current_file(date, &state);
            cache.insert(date, state);
            write_result
        };
        result?;

        if let Some(callback) = &self.on_append {
            if let Err(error) = callback(entry.clone()) {
                tracing::warn!(%error, "log sink post-append callback failed");
            }
        }

        Ok(entry)
    }
}

fn file_number_from_name(name: &str) -> u32 {
    let stem = name.strip_suffix(".json").unwrap_or(name);
    let after_prefix = stem.strip_prefix(FILE_PREFIX).unwrap_or(stem);
    match after_prefix.split_once('_') {
        Some((_, suffix)) => suffix.parse().unwrap_or(1),
        None => 1,
    }
}

fn read_entries(path: &std::path::Path) -> Option<Vec<LogEntry>> {
    let bytes = fs::read(path).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// In-memory test double for [`LogAppender`]; never touches disk.
#[derive(Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<LogEntry>>,
    next_id: std::sync::atomic::AtomicU64,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }
}

#[async_trait]
impl LogAppender for RecordingSink {
    async fn append(
        &self,
        kind: LogKind,
        message: String,
        details: Option<String>,
    ) -> Result<LogEntry, StorageError> {
        let id = self.next_id.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let mut entry = LogEntry::new(id, chrono::Utc::now(), kind, message);
        entry.details = details;
        self.entries.lock().push(entry.clone());
        Ok(entry)
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
