// SPDX-License-Identifier: MIT

use super::*;

#[tokio::test]
async fn try_send_reports_full_once_capacity_is_reached() {
    let (tx, mut rx) = channel();
    for i in 0..QUEUE_CAPACITY {
        assert_eq!(tx.try_send(PathBuf::from(format!("/w/{i}"))), TrySendOutcome::Sent);
    }
    assert_eq!(tx.try_send(PathBuf::from("/w/overflow")), TrySendOutcome::Full);

    let first = rx.recv().await.expect("first item");
    assert_eq!(first, PathBuf::from("/w/0"));
}

#[tokio::test]
async fn try_send_after_receiver_dropped_reports_closed() {
    let (tx, rx) = channel();
    drop(rx);
    assert_eq!(tx.try_send(PathBuf::from("/w/x")), TrySendOutcome::Closed);
}

#[tokio::test]
async fn receiver_yields_none_after_all_senders_dropped() {
    let (tx, mut rx) = channel();
    drop(tx);
    assert_eq!(rx.recv().await, None);
}
