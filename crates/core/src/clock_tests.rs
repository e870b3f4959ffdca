// SPDX-License-Identifier: MIT

use super::*;
use chrono::Duration;

#[test]
fn fake_clock_starts_at_epoch() {
    let clock = FakeClock::new();
    assert_eq!(clock.now_utc().timestamp(), 0);
}

#[test]
fn fake_clock_advances() {
    let clock = FakeClock::new();
    clock.advance(Duration::seconds(90));
    assert_eq!(clock.now_utc().timestamp(), 90);
}

#[test]
fn fake_clock_shared_handle_sees_advance() {
    let clock = FakeClock::new();
    let handle = clock.clone();
    clock.advance(Duration::seconds(5));
    assert_eq!(handle.now_utc().timestamp(), 5);
}

#[test]
fn system_clock_is_close_to_now() {
    let clock = SystemClock;
    let before = Utc::now();
    let observed = clock.now_utc();
    assert!(observed >= before - Duration::seconds(1));
}
