// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn insert_and_remove_track_len() {
    let set = RunningProcessSet::new();
    let (tx, _rx) = oneshot::channel();
    set.insert(1234, tx, Utc::now());
    assert_eq!(set.len(), 1);
    set.remove(1234);
    assert!(set.is_empty());
}

#[test]
fn signal_all_fires_every_kill_sender_and_drains() {
    let set = RunningProcessSet::new();
    let (tx1, rx1) = oneshot::channel();
    let (tx2, rx2) = oneshot::channel();
    set.insert(1, tx1, Utc::now());
    set.insert(2, tx2, Utc::now());

    set.signal_all();

    assert!(set.is_empty());
    assert!(rx1.try_recv().is_ok());
    assert!(rx2.try_recv().is_ok());
}
