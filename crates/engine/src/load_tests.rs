// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use tempfile::tempdir;
use tsq_core::id::EventId as CoreEventId;

fn created_event(n: u64, task_id: &str) -> EventRecord {
    EventRecord::new(
        CoreEventId(n),
        format!("2024-01-01T00:00:{n:02}.000Z"),
        "tester".to_string(),
        tsq_core::event::EventType::TaskCreated,
        Some(tsq_core::id::TaskId::from_string(task_id)),
        json!({ "kind": "task", "title": task_id }).as_object().cloned().unwrap(),
    )
}

#[test]
fn loads_from_empty_store() {
    let dir = tempdir().unwrap();
    let paths = StorePaths::new(dir.path().join(".tasque"));
    tsq_storage::init_store(&paths.root).unwrap();

    let loaded = load_projected_state(&paths).unwrap();
    assert!(loaded.state.tasks.is_empty());
    assert!(loaded.all_events.is_empty());
    assert!(loaded.warning.is_none());
    assert!(loaded.snapshot_event_count.is_none());
}

#[test]
fn replays_events_with_no_snapshot() {
    let dir = tempdir().unwrap();
    let paths = StorePaths::new(dir.path().join(".tasque"));
    tsq_storage::init_store(&paths.root).unwrap();

    {
        let mut wal = Wal::open(&paths.events_path()).unwrap();
        wal.append(created_event(0, "tsq-aaaaaaaa")).unwrap();
        wal.append(created_event(0, "tsq-bbbbbbbb")).unwrap();
    }

    let loaded = load_projected_state(&paths).unwrap();
    assert_eq!(loaded.state.tasks.len(), 2);
    assert_eq!(loaded.all_events.len(), 2);
}

#[test]
fn uses_snapshot_then_tails_remaining_events() {
    let dir = tempdir().unwrap();
    let paths = StorePaths::new(dir.path().join(".tasque"));
    tsq_storage::init_store(&paths.root).unwrap();

    let (first, second) = {
        let mut wal = Wal::open(&paths.events_path()).unwrap();
        let first = wal.append(created_event(0, "tsq-aaaaaaaa")).unwrap();
        let second = wal.append(created_event(0, "tsq-bbbbbbbb")).unwrap();
        (first, second)
    };

    let mut snapshot_state = State::new();
    crate::projector::apply_replay(&mut snapshot_state, &first);
    let snapshot = Snapshot::new(chrono::Utc::now(), first.event_id, snapshot_state);
    let snap_path = tsq_storage::snapshot::snapshot_path(&paths.snapshots_dir(), chrono::Utc::now(), first.event_id);
    snapshot.save(&snap_path).unwrap();

    let loaded = load_projected_state(&paths).unwrap();
    assert_eq!(loaded.state.tasks.len(), 2);
    assert_eq!(loaded.snapshot_event_count, Some(first.event_id));
    assert_eq!(loaded.all_events.len(), 2);
    let _ = second;
}

#[test]
fn snapshot_ahead_of_log_is_skipped_with_warning() {
    let dir = tempdir().unwrap();
    let paths = StorePaths::new(dir.path().join(".tasque"));
    tsq_storage::init_store(&paths.root).unwrap();

    let bogus_count = CoreEventId(99);
    let snapshot = Snapshot::new(chrono::Utc::now(), bogus_count, State::new());
    let snap_path = tsq_storage::snapshot::snapshot_path(&paths.snapshots_dir(), chrono::Utc::now(), bogus_count);
    snapshot.save(&snap_path).unwrap();

    {
        let mut wal = Wal::open(&paths.events_path()).unwrap();
        wal.append(created_event(0, "tsq-aaaaaaaa")).unwrap();
    }

    let loaded = load_projected_state(&paths).unwrap();
    assert_eq!(loaded.state.tasks.len(), 1);
    assert!(loaded.warning.is_some());
    assert!(loaded.snapshot_event_count.is_none());
}
