// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::dep::DepType;
use crate::task::{Task, TaskKind, TaskStatus};

fn task(id: &str) -> Task {
    Task::builder()
        .id(TaskId::from_string(id))
        .title("t")
        .build()
}

#[test]
fn insert_task_records_created_order() {
    let mut state = State::new();
    state.insert_task(task("tsq-aaaaaaaa"));
    state.insert_task(task("tsq-bbbbbbbb"));
    assert_eq!(
        state.created_order,
        vec![TaskId::from_string("tsq-aaaaaaaa"), TaskId::from_string("tsq-bbbbbbbb")]
    );
}

#[test]
fn next_child_suffix_increments_per_parent() {
    let mut state = State::new();
    let parent = TaskId::from_string("tsq-aaaaaaaa");
    assert_eq!(state.next_child_suffix(&parent), 1);
    assert_eq!(state.next_child_suffix(&parent), 2);
    let other = TaskId::from_string("tsq-bbbbbbbb");
    assert_eq!(state.next_child_suffix(&other), 1);
}

#[test]
fn add_and_remove_dep_round_trips() {
    let mut state = State::new();
    let child = TaskId::from_string("tsq-aaaaaaaa");
    let blocker = TaskId::from_string("tsq-bbbbbbbb");
    let edge = DependencyEdge::new(child.clone(), blocker.clone(), DepType::Blocks);
    state.add_dep(edge.clone());
    assert_eq!(state.deps_of(&child).count(), 1);
    state.remove_dep(&edge);
    assert_eq!(state.deps_of(&child).count(), 0);
}

#[test]
fn add_link_groups_by_kind() {
    let mut state = State::new();
    let from = TaskId::from_string("tsq-aaaaaaaa");
    let to = TaskId::from_string("tsq-bbbbbbbb");
    state.add_link(RelationLink::new(from.clone(), to.clone(), RelationKind::RelatesTo));
    let linked: Vec<_> = state.links_of(&from, RelationKind::RelatesTo).collect();
    assert_eq!(linked, vec![&to]);
    assert_eq!(state.links_of(&from, RelationKind::Duplicates).count(), 0);
}

#[test]
fn closed_task_flagged_via_status() {
    let mut t = task("tsq-aaaaaaaa");
    t.status = TaskStatus::Canceled;
    assert!(t.is_closed_like());
    assert_eq!(t.kind, TaskKind::Task);
}
