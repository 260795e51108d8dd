// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;
use tempfile::tempdir;
use tsq_core::test_support::fixture_task;

fn sample_snapshot(event_count: u64) -> Snapshot {
    let mut state = State::new();
    state.insert_task(fixture_task("tsq-aaaaaaaa", "seed"));
    state.applied_events = event_count;
    Snapshot::new(Utc::now(), EventId(event_count), state)
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot-3.json");
    let snapshot = sample_snapshot(3);
    snapshot.save(&path).unwrap();

    let loaded = Snapshot::load(&path).unwrap().unwrap();
    assert_eq!(loaded.event_count, EventId(3));
    assert_eq!(loaded.state.tasks.len(), 1);
}

#[test]
fn load_missing_file_returns_none() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot-1.json");
    assert!(Snapshot::load(&path).unwrap().is_none());
}

#[test]
fn load_corrupt_file_rotates_to_bak_and_returns_none() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot-1.json");
    let mut file = File::create(&path).unwrap();
    writeln!(file, "not json").unwrap();
    drop(file);

    let result = Snapshot::load(&path).unwrap();
    assert!(result.is_none());
    assert!(path.with_extension("bak").exists());
    assert!(!path.exists());
}

#[test]
fn rotate_bak_path_shifts_existing_backups() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot-1.json");
    fs::write(path.with_extension("bak"), "old-1").unwrap();
    fs::write(path.with_extension("bak.2"), "old-2").unwrap();

    let next = rotate_bak_path(&path);
    assert_eq!(next, path.with_extension("bak"));
}

#[test]
fn gc_keeps_only_the_five_newest_snapshots() {
    let dir = tempdir().unwrap();
    let now = Utc::now();
    for n in 1..=8u64 {
        sample_snapshot(n).save(&snapshot_path(dir.path(), now, EventId(n))).unwrap();
    }

    let removed = gc_snapshots(dir.path()).unwrap();
    assert_eq!(removed, 3);

    let remaining = list_snapshots(dir.path()).unwrap();
    assert_eq!(remaining.len(), 5);
    assert_eq!(remaining[0], snapshot_path(dir.path(), now, EventId(8)));
}

#[test]
fn list_snapshots_on_missing_dir_is_empty() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(list_snapshots(&missing).unwrap().is_empty());
}
