// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use tsq_core::dep::DepType;
use tsq_core::id::EventId;
use tsq_core::link::RelationKind;
use tsq_core::task::TaskKind;

fn id(s: &str) -> tsq_core::id::TaskId {
    tsq_core::id::TaskId::from_string(s)
}

fn record(n: u64, task_id: Option<&str>, event_type: EventType, payload: serde_json::Value) -> EventRecord {
    EventRecord::new(
        EventId(n),
        format!("2024-01-01T00:00:0{n}.000Z"),
        "tester".to_string(),
        event_type,
        task_id.map(id),
        payload.as_object().cloned().unwrap_or_default(),
    )
}

#[test]
fn task_created_inserts_root_task() {
    let mut state = State::new();
    let rec = record(
        1,
        Some("tsq-aaaaaaaa"),
        EventType::TaskCreated,
        json!({ "kind": "task", "title": "write docs" }),
    );
    apply_live(&mut state, &rec).unwrap();

    let task = state.get(&id("tsq-aaaaaaaa")).unwrap();
    assert_eq!(task.title, "write docs");
    assert_eq!(task.kind, TaskKind::Task);
    assert_eq!(task.status, TaskStatus::Open);
}

#[test]
fn task_created_child_allocates_from_parent_counter() {
    let mut state = State::new();
    let parent = record(1, Some("tsq-aaaaaaaa"), EventType::TaskCreated, json!({ "kind": "task", "title": "root" }));
    apply_live(&mut state, &parent).unwrap();

    let child = record(
        2,
        None,
        EventType::TaskCreated,
        json!({ "kind": "task", "title": "child", "parent_id": "tsq-aaaaaaaa" }),
    );
    apply_live(&mut state, &child).unwrap();

    assert!(state.contains(&id("tsq-aaaaaaaa.1")));
}

#[test]
fn task_created_missing_parent_is_rejected() {
    let mut state = State::new();
    let rec = record(
        1,
        None,
        EventType::TaskCreated,
        json!({ "kind": "task", "title": "orphan", "parent_id": "tsq-missing1" }),
    );
    assert!(apply_live(&mut state, &rec).is_err());
}

#[test]
fn task_claimed_transitions_open_to_in_progress() {
    let mut state = State::new();
    state.insert_task(tsq_core::test_support::fixture_task("tsq-aaaaaaaa", "a"));
    let rec = record(1, Some("tsq-aaaaaaaa"), EventType::TaskClaimed, json!({ "assignee": "alice" }));
    apply_live(&mut state, &rec).unwrap();

    let task = state.get(&id("tsq-aaaaaaaa")).unwrap();
    assert_eq!(task.status, TaskStatus::InProgress);
    assert_eq!(task.assignee.as_deref(), Some("alice"));
}

#[test]
fn task_claimed_by_different_assignee_conflicts() {
    let mut state = State::new();
    state.insert_task(tsq_core::test_support::fixture_task("tsq-aaaaaaaa", "a"));
    let first = record(1, Some("tsq-aaaaaaaa"), EventType::TaskClaimed, json!({ "assignee": "alice" }));
    apply_live(&mut state, &first).unwrap();

    let second = record(2, Some("tsq-aaaaaaaa"), EventType::TaskClaimed, json!({ "assignee": "bob" }));
    let err = apply_live(&mut state, &second).unwrap_err();
    assert!(matches!(err, ValidationError::ClaimConflict(..)));
}

#[test]
fn task_closed_then_reopened_round_trips_status() {
    let mut state = State::new();
    state.insert_task(tsq_core::test_support::fixture_task("tsq-aaaaaaaa", "a"));
    let close = record(1, Some("tsq-aaaaaaaa"), EventType::TaskClosed, json!({}));
    apply_live(&mut state, &close).unwrap();
    assert_eq!(state.get(&id("tsq-aaaaaaaa")).unwrap().status, TaskStatus::Closed);

    let reopen = record(2, Some("tsq-aaaaaaaa"), EventType::TaskReopened, json!({}));
    apply_live(&mut state, &reopen).unwrap();
    assert_eq!(state.get(&id("tsq-aaaaaaaa")).unwrap().status, TaskStatus::Open);
}

#[test]
fn reopening_a_task_that_is_not_closed_is_rejected() {
    let mut state = State::new();
    state.insert_task(tsq_core::test_support::fixture_task("tsq-aaaaaaaa", "a"));
    let rec = record(1, Some("tsq-aaaaaaaa"), EventType::TaskReopened, json!({}));
    assert!(apply_live(&mut state, &rec).is_err());
}

#[test]
fn dep_added_rejects_self_edge() {
    let mut state = State::new();
    state.insert_task(tsq_core::test_support::fixture_task("tsq-aaaaaaaa", "a"));
    let rec = record(
        1,
        Some("tsq-aaaaaaaa"),
        EventType::DepAdded,
        json!({ "blocker": "tsq-aaaaaaaa", "dep_type": "blocks" }),
    );
    assert!(matches!(apply_live(&mut state, &rec), Err(ValidationError::SelfEdge(_))));
}

#[test]
fn dep_added_rejects_cycle() {
    let mut state = State::new();
    state.insert_task(tsq_core::test_support::fixture_task("tsq-aaaaaaaa", "a"));
    state.insert_task(tsq_core::test_support::fixture_task("tsq-bbbbbbbb", "b"));
    state.add_dep(tsq_core::dep::DependencyEdge::new(id("tsq-aaaaaaaa"), id("tsq-bbbbbbbb"), DepType::Blocks));

    let rec = record(
        1,
        Some("tsq-bbbbbbbb"),
        EventType::DepAdded,
        json!({ "blocker": "tsq-aaaaaaaa", "dep_type": "blocks" }),
    );
    assert!(matches!(apply_live(&mut state, &rec), Err(ValidationError::DependencyCycle)));
}

#[test]
fn dep_added_then_removed_clears_edge() {
    let mut state = State::new();
    state.insert_task(tsq_core::test_support::fixture_task("tsq-aaaaaaaa", "a"));
    state.insert_task(tsq_core::test_support::fixture_task("tsq-bbbbbbbb", "b"));

    let add = record(1, Some("tsq-aaaaaaaa"), EventType::DepAdded, json!({ "blocker": "tsq-bbbbbbbb", "dep_type": "blocks" }));
    apply_live(&mut state, &add).unwrap();
    assert_eq!(state.deps_of(&id("tsq-aaaaaaaa")).count(), 1);

    let remove = record(2, Some("tsq-aaaaaaaa"), EventType::DepRemoved, json!({ "blocker": "tsq-bbbbbbbb", "dep_type": "blocks" }));
    apply_live(&mut state, &remove).unwrap();
    assert_eq!(state.deps_of(&id("tsq-aaaaaaaa")).count(), 0);
}

#[test]
fn task_duplicated_closes_source_and_adds_link() {
    let mut state = State::new();
    state.insert_task(tsq_core::test_support::fixture_task("tsq-aaaaaaaa", "a"));
    state.insert_task(tsq_core::test_support::fixture_task("tsq-bbbbbbbb", "b"));

    let rec = record(1, Some("tsq-aaaaaaaa"), EventType::TaskDuplicated, json!({ "duplicate_of": "tsq-bbbbbbbb" }));
    apply_live(&mut state, &rec).unwrap();

    let task = state.get(&id("tsq-aaaaaaaa")).unwrap();
    assert_eq!(task.status, TaskStatus::Closed);
    assert_eq!(task.duplicate_of, Some(id("tsq-bbbbbbbb")));
    assert_eq!(state.links_of(&id("tsq-aaaaaaaa"), RelationKind::Duplicates).count(), 1);
}

#[test]
fn label_added_then_removed_round_trips() {
    let mut state = State::new();
    state.insert_task(tsq_core::test_support::fixture_task("tsq-aaaaaaaa", "a"));

    let add = record(1, Some("tsq-aaaaaaaa"), EventType::LabelAdded, json!({ "label": "Backend" }));
    apply_live(&mut state, &add).unwrap();
    assert!(state.get(&id("tsq-aaaaaaaa")).unwrap().labels.iter().any(|l| l.as_str() == "backend"));

    let remove = record(2, Some("tsq-aaaaaaaa"), EventType::LabelRemoved, json!({ "label": "Backend" }));
    apply_live(&mut state, &remove).unwrap();
    assert!(state.get(&id("tsq-aaaaaaaa")).unwrap().labels.is_empty());
}

#[test]
fn note_added_appends_in_order() {
    let mut state = State::new();
    state.insert_task(tsq_core::test_support::fixture_task("tsq-aaaaaaaa", "a"));

    let rec = record(1, Some("tsq-aaaaaaaa"), EventType::NoteAdded, json!({ "text": "looked into it" }));
    apply_live(&mut state, &rec).unwrap();

    let task = state.get(&id("tsq-aaaaaaaa")).unwrap();
    assert_eq!(task.notes.len(), 1);
    assert_eq!(task.notes[0].text, "looked into it");
}

#[test]
fn spec_attached_records_fingerprint() {
    let mut state = State::new();
    state.insert_task(tsq_core::test_support::fixture_task("tsq-aaaaaaaa", "a"));

    let rec = record(
        1,
        Some("tsq-aaaaaaaa"),
        EventType::SpecAttached,
        json!({ "spec_path": "specs/tsq-aaaaaaaa.md", "spec_fingerprint": "deadbeef", "spec_attached_by": "alice" }),
    );
    apply_live(&mut state, &rec).unwrap();

    let task = state.get(&id("tsq-aaaaaaaa")).unwrap();
    assert_eq!(task.spec_fingerprint.as_deref(), Some("deadbeef"));
}

#[test]
fn unknown_event_type_is_a_no_op_during_replay() {
    let mut state = State::new();
    let rec = record(1, Some("tsq-aaaaaaaa"), EventType::Unknown, json!({ "whatever": true }));
    assert!(apply_replay(&mut state, &rec).is_none());
}

#[test]
fn replay_skips_and_warns_on_failed_precondition() {
    let mut state = State::new();
    let rec = record(1, Some("tsq-aaaaaaaa"), EventType::TaskClaimed, json!({ "assignee": "alice" }));
    let warning = apply_replay(&mut state, &rec);
    assert!(warning.is_some());
    assert!(!state.contains(&id("tsq-aaaaaaaa")));
}

#[test]
fn repair_applied_removes_orphan_dep() {
    let mut state = State::new();
    state.insert_task(tsq_core::test_support::fixture_task("tsq-aaaaaaaa", "a"));
    state.add_dep(tsq_core::dep::DependencyEdge::new(id("tsq-aaaaaaaa"), id("tsq-missing1"), DepType::Blocks));

    let rec = record(
        1,
        None,
        EventType::RepairApplied,
        json!({ "items": [{ "kind": "orphan_dep", "task_id": "tsq-aaaaaaaa", "blocker": "tsq-missing1", "dep_type": "blocks" }] }),
    );
    apply_live(&mut state, &rec).unwrap();

    assert_eq!(state.deps_of(&id("tsq-aaaaaaaa")).count(), 0);
}
