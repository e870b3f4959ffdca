// SPDX-License-Identifier: MIT

use super::*;
use fb_core::SystemClock;

#[tokio::test]
async fn watcher_emits_candidates_from_rescan_and_notifications() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("existing.bin"), b"pre-existing").expect("write");

    let (tx, mut rx) = mpsc::channel(64);
    let watcher = Watcher::spawn(
        dir.path().to_path_buf(),
        Duration::from_secs(30),
        tx,
        SystemClock,
    );

    // First rescan fires immediately and should surface the pre-existing file.
    let first = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("first rescan event")
        .expect("channel open");
    assert!(first.file_path.ends_with("existing.bin"));

    // A new file should be observed via the OS notifier well before the
    // next 30s rescan tick.
    tokio::time::sleep(Duration::from_millis(200)).await;
    std::fs::write(dir.path().join("fresh.bin"), b"fresh").expect("write");

    let mut saw_fresh = false;
    for _ in 0..20 {
        match tokio::time::timeout(Duration::from_millis(500), rx.recv()).await {
            Ok(Some(event)) if event.file_path.ends_with("fresh.bin") => {
                saw_fresh = true;
                break;
            }
            Ok(Some(_)) => continue,
            _ => break,
        }
    }
    assert!(saw_fresh, "expected the notifier to surface the new file");

    watcher.stop().await;
}
