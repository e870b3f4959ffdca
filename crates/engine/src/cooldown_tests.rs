// SPDX-License-Identifier: MIT

use super::*;

fn at(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).expect("valid timestamp")
}

#[test]
fn fresh_completion_blocks_readmission_within_horizon() {
    let map = CooldownMap::new();
    let path = PathBuf::from("/w/foo.bin");
    let horizon = Duration::seconds(60);
    map.record(path.clone(), at(1000));

    assert!(map.is_in_cooldown(&path, at(1030), horizon));
    assert!(!map.is_in_cooldown(&path, at(1061), horizon));
}

#[test]
fn unrecorded_path_is_never_in_cooldown() {
    let map = CooldownMap::new();
    assert!(!map.is_in_cooldown(&PathBuf::from("/w/never.bin"), at(1000), Duration::seconds(60)));
}

#[test]
fn garbage_collect_drops_entries_older_than_twice_horizon() {
    let map = CooldownMap::new();
    let horizon = Duration::seconds(60);
    map.record(PathBuf::from("/w/old.bin"), at(0));
    map.record(PathBuf::from("/w/recent.bin"), at(1000));

    map.garbage_collect(at(1000), horizon);

    assert_eq!(map.len(), 1);
    assert!(!map.is_in_cooldown(&PathBuf::from("/w/old.bin"), at(1000), horizon));
    assert!(map.is_in_cooldown(&PathBuf::from("/w/recent.bin"), at(1000), horizon));
}
