// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn event_type_wire_strings_round_trip() {
    let pairs = [
        (EventType::TaskCreated, "task.created"),
        (EventType::TaskClaimed, "task.claimed"),
        (EventType::DepAdded, "dep.added"),
        (EventType::SpecAttached, "spec.attached"),
        (EventType::RepairApplied, "repair.applied"),
    ];
    for (variant, wire) in pairs {
        let serialized = serde_json::to_value(variant).unwrap();
        assert_eq!(serialized, json!(wire));
    }
}

#[test]
fn unknown_event_type_deserializes_without_error() {
    let value = json!("future.event");
    let parsed: EventType = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, EventType::Unknown);
}

#[test]
fn event_record_round_trips_through_json() {
    let mut payload = Map::new();
    payload.insert("title".into(), json!("fix the thing"));
    let record = EventRecord::new(
        EventId(1),
        "2024-01-01T00:00:00.000Z",
        "alice",
        EventType::TaskCreated,
        Some(TaskId::from_string("tsq-abcd1234")),
        payload,
    );
    let wire = serde_json::to_value(&record).unwrap();
    assert_eq!(wire["type"], json!("task.created"));
    assert_eq!(wire["task_id"], json!("tsq-abcd1234"));

    let back: EventRecord = serde_json::from_value(wire).unwrap();
    assert_eq!(back, record);
}

#[test]
fn task_created_payload_parses_from_generic_map() {
    let mut payload = Map::new();
    payload.insert("kind".into(), json!("feature"));
    payload.insert("title".into(), json!("ship it"));
    payload.insert("priority".into(), json!(1));

    let parsed: TaskCreatedPayload = serde_json::from_value(Value::Object(payload)).unwrap();
    assert_eq!(parsed.title, "ship it");
    assert_eq!(parsed.kind, TaskKind::Feature);
    assert_eq!(parsed.priority.unwrap().value(), 1);
}
