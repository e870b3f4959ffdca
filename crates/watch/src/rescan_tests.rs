// SPDX-License-Identifier: MIT

use super::*;
use fb_core::SystemClock;
use tokio::sync::mpsc;

#[tokio::test]
async fn enumerate_once_emits_each_regular_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("a.txt"), b"a").expect("write");
    std::fs::write(dir.path().join("b.txt"), b"b").expect("write");
    std::fs::create_dir(dir.path().join("subdir")).expect("mkdir");

    let (tx, mut rx) = mpsc::channel(16);
    let count = enumerate_once(dir.path(), &tx, &SystemClock, DetectionSource::Polling).await;
    drop(tx);

    assert_eq!(count, 2);
    let mut seen = Vec::new();
    while let Some(event) = rx.recv().await {
        assert_eq!(event.detection_source, DetectionSource::Polling);
        seen.push(event.file_path);
    }
    assert_eq!(seen.len(), 2);
}

#[tokio::test]
async fn enumerate_once_on_missing_directory_yields_zero() {
    let (tx, _rx) = mpsc::channel(16);
    let count = enumerate_once(
        Path::new("/nonexistent/path/for/fb-watch-tests"),
        &tx,
        &SystemClock,
        DetectionSource::Polling,
    )
    .await;
    assert_eq!(count, 0);
}

#[tokio::test(start_paused = true)]
async fn run_fires_first_rescan_immediately() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("a.txt"), b"a").expect("write");

    let (tx, mut rx) = mpsc::channel(16);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(run(
        dir.path().to_path_buf(),
        Duration::from_secs(30),
        tx,
        SystemClock,
        shutdown_rx,
    ));

    let first = tokio::time::timeout(Duration::from_millis(500), rx.recv())
        .await
        .expect("first rescan should fire immediately")
        .expect("channel open");
    assert!(first.file_path.ends_with("a.txt"));

    handle.abort();
}
