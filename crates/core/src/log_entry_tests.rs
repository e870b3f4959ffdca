// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn log_entry_serializes_field_names_per_spec() {
    let entry = LogEntry::new(1, Utc::now(), LogKind::ProcessError, "exe missing")
        .with_details("executablePath was empty");
    let json = serde_json::to_value(&entry).expect("serialize");
    assert_eq!(json["id"], 1);
    assert_eq!(json["logType"], "processError");
    assert_eq!(json["message"], "exe missing");
    assert_eq!(json["details"], "executablePath was empty");
}

#[test]
fn log_entry_omits_absent_details() {
    let entry = LogEntry::new(2, Utc::now(), LogKind::FileEvent, "admitted");
    let json = serde_json::to_value(&entry).expect("serialize");
    assert!(json.get("details").is_none());
}

#[test]
fn log_entry_round_trips() {
    let entry = LogEntry::new(3, Utc::now(), LogKind::WatcherError, "notifier rebuilt");
    let json = serde_json::to_string(&entry).expect("serialize");
    let back: LogEntry = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.id, 3);
    assert_eq!(back.message, "notifier rebuilt");
}
