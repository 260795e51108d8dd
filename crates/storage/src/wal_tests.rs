// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use tempfile::tempdir;
use tsq_core::event::EventType;
use tsq_core::id::TaskId;

fn test_record(title: &str) -> EventRecord {
    let mut payload = serde_json::Map::new();
    payload.insert("kind".into(), json!("task"));
    payload.insert("title".into(), json!(title));
    EventRecord::new(
        EventId(0),
        "2024-01-01T00:00:00.000Z",
        "tester",
        EventType::TaskCreated,
        Some(TaskId::from_string("tsq-aaaaaaaa")),
        payload,
    )
}

#[test]
fn open_creates_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");

    let wal = Wal::open(&path).unwrap();
    assert!(path.exists());
    assert_eq!(wal.tail(), EventId(0));
}

#[test]
fn append_assigns_sequential_ids() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let mut wal = Wal::open(&path).unwrap();

    let a = wal.append(test_record("first")).unwrap();
    let b = wal.append(test_record("second")).unwrap();

    assert_eq!(a.event_id, EventId(1));
    assert_eq!(b.event_id, EventId(2));
    assert_eq!(wal.tail(), EventId(2));
}

#[test]
fn reopen_resumes_tail_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    {
        let mut wal = Wal::open(&path).unwrap();
        wal.append(test_record("a")).unwrap();
        wal.append(test_record("b")).unwrap();
    }

    let wal = Wal::open(&path).unwrap();
    assert_eq!(wal.tail(), EventId(2));
}

#[test]
fn read_all_returns_records_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let mut wal = Wal::open(&path).unwrap();
    wal.append(test_record("a")).unwrap();
    wal.append(test_record("b")).unwrap();

    let records = wal.read_all().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].event_id, EventId(1));
    assert_eq!(records[1].event_id, EventId(2));
}

#[test]
fn read_after_filters_by_event_id() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let mut wal = Wal::open(&path).unwrap();
    wal.append(test_record("a")).unwrap();
    wal.append(test_record("b")).unwrap();
    wal.append(test_record("c")).unwrap();

    let records = wal.read_after(EventId(1)).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].event_id, EventId(2));
}

#[test]
fn append_batch_commits_as_one_unit() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let mut wal = Wal::open(&path).unwrap();

    let batch = vec![test_record("a"), test_record("b")];
    let committed = wal.append_batch(batch).unwrap();
    assert_eq!(committed[0].event_id, EventId(1));
    assert_eq!(committed[1].event_id, EventId(2));
    assert_eq!(wal.read_all().unwrap().len(), 2);
}

#[test]
fn corrupt_tail_is_rotated_to_bak() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    {
        let mut wal = Wal::open(&path).unwrap();
        wal.append(test_record("a")).unwrap();
    }

    // Append a line that won't parse as an EventRecord.
    {
        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        use std::io::Write;
        writeln!(file, "{{not valid json").unwrap();
    }

    let wal = Wal::open(&path).unwrap();
    assert_eq!(wal.tail(), EventId(1));
    assert!(path.with_extension("bak").exists());
    assert_eq!(wal.read_all().unwrap().len(), 1);
}

#[test]
fn read_all_skips_a_corrupt_line_and_keeps_reading() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let wal = Wal::open(&path).unwrap();

    // Write directly to the file, bypassing `Wal::append`, to land a corrupt
    // line in the middle of otherwise-valid ones without going through
    // `open`'s tail-scan/rotation.
    {
        let mut file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
        use std::io::Write;
        writeln!(file, "{}", serde_json::to_string(&test_record("a")).unwrap()).unwrap();
        writeln!(file, "{{not valid json").unwrap();
        writeln!(file, "{}", serde_json::to_string(&test_record("b")).unwrap()).unwrap();
        file.sync_all().unwrap();
    }

    let records = wal.read_all().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].payload.get("title"), Some(&json!("a")));
    assert_eq!(records[1].payload.get("title"), Some(&json!("b")));
}
