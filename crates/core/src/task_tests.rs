// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn priority_rejects_out_of_range() {
    assert!(Priority::new(3).is_some());
    assert!(Priority::new(4).is_none());
}

#[test]
fn label_normalizes_case() {
    let label = Label::parse("Backend-API").unwrap();
    assert_eq!(label.as_str(), "backend-api");
}

#[test]
fn label_rejects_bad_first_char() {
    assert!(Label::parse("_oops").is_err());
    assert!(Label::parse("").is_err());
}

#[test]
fn label_rejects_disallowed_chars() {
    assert!(Label::parse("has space").is_err());
    assert!(Label::parse("has!bang").is_err());
}

#[test]
fn status_satisfies_blocker_only_for_closed_or_canceled() {
    assert!(TaskStatus::Closed.satisfies_blocker());
    assert!(TaskStatus::Canceled.satisfies_blocker());
    assert!(!TaskStatus::Open.satisfies_blocker());
    assert!(!TaskStatus::Blocked.satisfies_blocker());
}

#[test]
fn status_is_workable_for_open_and_in_progress_only() {
    assert!(TaskStatus::Open.is_workable());
    assert!(TaskStatus::InProgress.is_workable());
    assert!(!TaskStatus::Closed.is_workable());
    assert!(!TaskStatus::Deferred.is_workable());
}

#[test]
fn builder_produces_sane_defaults() {
    let task = Task::builder().title("write docs").build();
    assert_eq!(task.title, "write docs");
    assert_eq!(task.status, TaskStatus::Open);
    assert_eq!(task.priority, Priority::default());
    assert!(task.labels.is_empty());
    assert!(task.notes.is_empty());
    assert_eq!(task.planning_state, PlanningState::NeedsPlanning);
}

#[test]
fn display_matches_wire_strings() {
    assert_eq!(TaskKind::Feature.to_string(), "feature");
    assert_eq!(TaskStatus::InProgress.to_string(), "in_progress");
    assert_eq!(PlanningState::Planned.to_string(), "planned");
}
