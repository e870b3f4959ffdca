// SPDX-License-Identifier: MIT

use super::*;
use fb_core::{DetectionSource, EventKind, WatchProfileBuilder};
use fb_storage::RecordingSink;
use std::time::Duration;

fn event(path: std::path::PathBuf) -> FileEvent {
    FileEvent::new(path, EventKind::Created, DetectionSource::WorkQueue, Utc::now())
}

#[test]
fn tokenize_respects_quoted_spans() {
    let tokens = tokenize(r#"--in "{FilePath}" --flag"#);
    assert_eq!(tokens, vec!["--in", "{FilePath}", "--flag"]);
}

#[test]
fn tokenize_splits_on_unquoted_whitespace_only() {
    let tokens = tokenize("  a   b\tc  ");
    assert_eq!(tokens, vec!["a", "b", "c"]);
}

#[test]
fn substitute_expands_both_placeholders_once_per_token() {
    assert_eq!(
        substitute("{FolderPath}/{FilePath}", "/w/a.bin", "/w"),
        "/w//w/a.bin"
    );
}

#[tokio::test]
async fn quoted_argument_with_spaces_becomes_one_token() {
    let dir = tempfile::tempdir().expect("tempdir");
    let profile = WatchProfileBuilder::new("inbox", dir.path())
        .executable_path("/bin/true")
        .arguments(r#"--in "{FilePath}" --flag"#)
        .build()
        .expect("valid profile");
    let target = dir.path().join("has space.dat");
    let args = build_arguments(&profile, &event(target.clone()));
    assert_eq!(args, vec!["--in", &target.display().to_string(), "--flag"]);
}

#[tokio::test]
async fn missing_executable_logs_process_error_without_spawning() {
    let dir = tempfile::tempdir().expect("tempdir");
    let profile = WatchProfileBuilder::new("inbox", dir.path())
        .executable_path(dir.path().join("does-not-exist"))
        .build()
        .expect("valid profile");
    let launcher = Launcher::new(0);
    let sink = Arc::new(RecordingSink::new());

    launcher.launch(&profile, &event(dir.path().join("x")), sink.clone()).await;

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].log_type, LogKind::ProcessError);
    assert_eq!(launcher.running_count(), 0);
}

#[tokio::test]
async fn successful_launch_logs_process_launch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let profile = WatchProfileBuilder::new("inbox", dir.path())
        .executable_path("/bin/true")
        .build()
        .expect("valid profile");
    let launcher = Launcher::new(0);
    let sink = Arc::new(RecordingSink::new());

    launcher.launch(&profile, &event(dir.path().join("x")), sink.clone()).await;
    launcher.shutdown().await;

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].log_type, LogKind::ProcessLaunch);
}

#[tokio::test]
async fn nonzero_exit_logs_process_error_with_exit_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let profile = WatchProfileBuilder::new("inbox", dir.path())
        .executable_path("/bin/sh")
        .arguments(r#"-c "exit 7""#)
        .build()
        .expect("valid profile");
    let launcher = Launcher::new(0);
    let sink = Arc::new(RecordingSink::new());

    launcher.launch(&profile, &event(dir.path().join("x")), sink.clone()).await;
    launcher.shutdown().await;

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].log_type, LogKind::ProcessError);
    assert_eq!(entries[0].details.as_deref(), Some("7"));
}

#[tokio::test]
async fn concurrency_bound_is_respected_and_every_launch_eventually_completes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let profile = WatchProfileBuilder::new("inbox", dir.path())
        .executable_path("/bin/sh")
        .arguments(r#"-c "sleep 0.1""#)
        .max_concurrent_processes(2)
        .build()
        .expect("valid profile");
    let launcher = Launcher::new(profile.max_concurrent_processes);
    let sink = Arc::new(RecordingSink::new());

    for i in 0..5 {
        launcher
            .launch(&profile, &event(dir.path().join(format!("f{i}"))), sink.clone())
            .await;
        assert!(launcher.running_count() <= 2);
    }

    for _ in 0..50 {
        if launcher.running_count() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(launcher.running_count(), 0);
    assert_eq!(sink.entries().len(), 5);
    assert!(sink.entries().iter().all(|e| e.log_type == LogKind::ProcessLaunch));
}

#[tokio::test]
async fn shutdown_terminates_a_long_running_child() {
    let dir = tempfile::tempdir().expect("tempdir");
    let profile = WatchProfileBuilder::new("inbox", dir.path())
        .executable_path("/bin/sh")
        .arguments(r#"-c "sleep 30""#)
        .build()
        .expect("valid profile");
    let launcher = Launcher::new(0);
    let sink = Arc::new(RecordingSink::new());

    launcher.launch(&profile, &event(dir.path().join("x")), sink.clone()).await;
    assert_eq!(launcher.running_count(), 1);

    let result = tokio::time::timeout(Duration::from_secs(5), launcher.shutdown()).await;
    assert!(result.is_ok(), "shutdown should terminate the child promptly");
    assert_eq!(launcher.running_count(), 0);
}
