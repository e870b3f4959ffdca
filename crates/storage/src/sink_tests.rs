// SPDX-License-Identifier: MIT

use super::*;
use fb_core::FakeClock;
use std::sync::atomic::{AtomicUsize, Ordering};

fn date(y: i32, m: u32, d: u32) -> chrono::DateTime<chrono::Utc> {
    chrono::NaiveDate::from_ymd_opt(y, m, d)
        .expect("valid date")
        .and_hms_opt(12, 0, 0)
        .expect("valid time")
        .and_utc()
}

#[tokio::test]
async fn append_writes_current_file_in_full() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = FakeClock::at(date(2026, 7, 28));
    let sink = LogSink::new(dir.path().to_path_buf(), 10_000, clock);

    sink.append(LogKind::FileEvent, "admitted foo.bin".into(), None)
        .await
        .expect("append");
    sink.append(LogKind::ProcessLaunch, "launched".into(), None)
        .await
        .expect("append");

    let path = dir.path().join("filebridge_monitor_20260728.json");
    let contents = std::fs::read_to_string(&path).expect("read");
    let entries: Vec<LogEntry> = serde_json::from_str(&contents).expect("parse");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].message, "admitted foo.bin");
    assert_eq!(entries[1].message, "launched");
}

#[tokio::test]
async fn rotation_starts_a_new_numbered_file_at_capacity() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = FakeClock::at(date(2026, 7, 28));
    let sink = LogSink::new(dir.path().to_path_buf(), 2, clock);

    for i in 0..5 {
        sink.append(LogKind::FileEvent, format!("entry {i}"), None)
            .await
            .expect("append");
    }

    let file1 = dir.path().join("filebridge_monitor_20260728.json");
    let file2 = dir.path().join("filebridge_monitor_20260728_0002.json");
    let file3 = dir.path().join("filebridge_monitor_20260728_0003.json");

    let entries1: Vec<LogEntry> =
        serde_json::from_str(&std::fs::read_to_string(&file1).expect("read")).expect("parse");
    let entries2: Vec<LogEntry> =
        serde_json::from_str(&std::fs::read_to_string(&file2).expect("read")).expect("parse");
    let entries3: Vec<LogEntry> =
        serde_json::from_str(&std::fs::read_to_string(&file3).expect("read")).expect("parse");

    assert_eq!(entries1.len(), 2);
    assert_eq!(entries2.len(), 2);
    assert_eq!(entries3.len(), 1);
    assert!(entries1[0].id < entries2[0].id);
    assert!(entries2.last().expect("entry").id < entries3[0].id);
}

#[tokio::test]
async fn reopening_a_date_reloads_current_file_number_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = FakeClock::at(date(2026, 7, 28));

    {
        let sink = LogSink::new(dir.path().to_path_buf(), 1, clock.clone());
        sink.append(LogKind::FileEvent, "a".into(), None)
            .await
            .expect("append");
        sink.append(LogKind::FileEvent, "b".into(), None)
            .await
            .expect("append");
    }

    // A fresh LogSink instance (simulating daemon restart) must pick up
    // file number 2, not clobber file number 1.
    let sink = LogSink::new(dir.path().to_path_buf(), 1, clock);
    sink.append(LogKind::FileEvent, "c".into(), None)
        .await
        .expect("append");

    let file2 = dir.path().join("filebridge_monitor_20260728_0002.json");
    let entries: Vec<LogEntry> =
        serde_json::from_str(&std::fs::read_to_string(&file2).expect("read")).expect("parse");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].message, "c");
}

#[tokio::test]
async fn post_append_callback_is_invoked_and_failures_are_swallowed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = FakeClock::at(date(2026, 7, 28));
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = Arc::clone(&calls);

    let sink = LogSink::new(dir.path().to_path_buf(), 10_000, clock).with_post_append_callback(
        Arc::new(move |_entry| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            Err("subscriber unreachable".to_string())
        }),
    );

    let result = sink
        .append(LogKind::WatcherError, "notifier rebuilt".into(), None)
        .await;
    assert!(result.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn evict_cache_drops_the_buffered_state_for_that_date() {
    let dir = tempfile::tempdir().expect("tempdir");
    let old_date = date(2026, 6, 1).date_naive();
    let clock = FakeClock::at(date(2026, 6, 1));
    let sink = LogSink::new(dir.path().to_path_buf(), 10_000, clock);

    sink.append(LogKind::FileEvent, "a".into(), None).await.expect("append");
    assert_eq!(sink.cache.lock().len(), 1);

    sink.evict_cache(old_date);
    assert!(sink.cache.lock().is_empty());
}

#[tokio::test]
async fn recording_sink_collects_entries_without_touching_disk() {
    let sink = RecordingSink::new();
    sink.append(LogKind::FileEvent, "one".into(), None)
        .await
        .expect("append");
    sink.append(LogKind::ProcessError, "two".into(), Some("detail".into()))
        .await
        .expect("append");

    let entries = sink.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].details.as_deref(), Some("detail"));
}
