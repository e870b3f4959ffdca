// SPDX-License-Identifier: MIT

use super::*;
use fb_core::{SystemClock, WatchProfileBuilder};
use fb_storage::RecordingSink;

#[tokio::test]
async fn missing_watch_directory_starts_idle_and_logs_watcher_error() {
    let sink = Arc::new(RecordingSink::new());
    let profile = WatchProfileBuilder::new("inbox", "/no/such/directory")
        .executable_path("/bin/true")
        .build()
        .expect("valid profile");

    let pipeline = ProfilePipeline::start(profile, sink.clone(), SystemClock).await;
    assert!(pipeline.is_idle());
    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].log_type, LogKind::WatcherError);

    pipeline.stop().await;
}

#[tokio::test]
async fn a_single_write_produces_exactly_one_launch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let sink = Arc::new(RecordingSink::new());
    let profile = WatchProfileBuilder::new("inbox", dir.path())
        .executable_path("/bin/true")
        .polling_interval_seconds(1)
        .size_check_interval_ms(10)
        .size_stability_check_count(2)
        .build()
        .expect("valid profile");

    let pipeline = ProfilePipeline::start(profile, sink.clone(), SystemClock).await;
    std::fs::write(dir.path().join("foo.bin"), vec![0u8; 1024]).expect("write");

    let mut launches = 0;
    for _ in 0..40 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        launches = sink
            .entries()
            .iter()
            .filter(|e| e.log_type == LogKind::ProcessLaunch)
            .count();
        if launches >= 1 {
            break;
        }
    }
    assert_eq!(launches, 1);

    pipeline.stop().await;
}

#[tokio::test]
async fn manual_scan_bypasses_cooldown_to_readmit_already_dispatched_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let sink: Arc<RecordingSink> = Arc::new(RecordingSink::new());
    // A long polling interval means only the immediate first rescan (and
    // the OS notifier) can admit these files automatically; by the time
    // we manually scan, both should already be dispatched and cooling
    // down, with nothing left in the ActiveFileSet to block a re-scan.
    let profile = WatchProfileBuilder::new("inbox", dir.path())
        .executable_path("/bin/true")
        .polling_interval_seconds(3600)
        .build()
        .expect("valid profile");

    std::fs::write(dir.path().join("a.bin"), b"x").expect("write");
    std::fs::write(dir.path().join("b.bin"), b"y").expect("write");

    let pipeline = ProfilePipeline::start(profile, sink.clone(), SystemClock).await;

    let mut launches = 0;
    for _ in 0..40 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        launches = sink
            .entries()
            .iter()
            .filter(|e| e.log_type == LogKind::ProcessLaunch)
            .count();
        if launches >= 2 {
            break;
        }
    }
    assert_eq!(launches, 2, "both files should be admitted and launched by the first rescan");

    let admitted = pipeline.manual_scan(sink.as_ref()).await.expect("manual scan");
    assert_eq!(admitted, 2, "manual scan bypasses cooldown and re-admits both files");

    pipeline.stop().await;
}
