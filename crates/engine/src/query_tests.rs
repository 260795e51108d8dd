// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tsq_core::dep::DependencyEdge;
use tsq_core::task::{Label, TaskStatus};
use tsq_core::test_support::{fixture_task, fixture_task_with_status};

fn id(s: &str) -> TaskId {
    TaskId::from_string(s)
}

fn search(state: &State, q: &str) -> Vec<TaskId> {
    evaluate(state, &parse(q).unwrap())
}

#[test]
fn bare_words_match_title_substring() {
    let mut state = State::new();
    state.insert_task(fixture_task("tsq-aaaaaaaa", "fix login bug"));
    state.insert_task(fixture_task("tsq-bbbbbbbb", "write docs"));

    let hits = search(&state, "login bug");
    assert_eq!(hits, vec![id("tsq-aaaaaaaa")]);
}

#[test]
fn field_term_matches_status() {
    let mut state = State::new();
    state.insert_task(fixture_task_with_status("tsq-aaaaaaaa", "a", TaskStatus::Closed));
    state.insert_task(fixture_task("tsq-bbbbbbbb", "b"));

    let hits = search(&state, "status:closed");
    assert_eq!(hits, vec![id("tsq-aaaaaaaa")]);
}

#[test]
fn negated_field_term_excludes_matches() {
    let mut state = State::new();
    state.insert_task(fixture_task_with_status("tsq-aaaaaaaa", "a", TaskStatus::Closed));
    state.insert_task(fixture_task("tsq-bbbbbbbb", "b"));

    let hits = search(&state, "-status:closed");
    assert_eq!(hits, vec![id("tsq-bbbbbbbb")]);
}

#[test]
fn quoted_field_value_preserves_spaces() {
    let mut state = State::new();
    state.insert_task(fixture_task("tsq-aaaaaaaa", "fix login bug"));

    let hits = search(&state, r#"title:"login bug""#);
    assert_eq!(hits, vec![id("tsq-aaaaaaaa")]);
}

#[test]
fn label_field_matches_normalized_label() {
    let mut state = State::new();
    let mut task = fixture_task("tsq-aaaaaaaa", "a");
    task.labels.insert(Label::parse("backend").unwrap());
    state.insert_task(task);
    state.insert_task(fixture_task("tsq-bbbbbbbb", "b"));

    let hits = search(&state, "label:backend");
    assert_eq!(hits, vec![id("tsq-aaaaaaaa")]);
}

#[test]
fn multiple_terms_combine_with_and() {
    let mut state = State::new();
    state.insert_task(fixture_task_with_status("tsq-aaaaaaaa", "fix login bug", TaskStatus::Closed));
    state.insert_task(fixture_task("tsq-bbbbbbbb", "fix login bug"));

    let hits = search(&state, "login status:closed");
    assert_eq!(hits, vec![id("tsq-aaaaaaaa")]);
}

#[test]
fn dep_type_in_matches_incoming_edges() {
    let mut state = State::new();
    state.insert_task(fixture_task("tsq-aaaaaaaa", "a"));
    state.insert_task(fixture_task("tsq-bbbbbbbb", "b"));
    state.add_dep(DependencyEdge::new(id("tsq-aaaaaaaa"), id("tsq-bbbbbbbb"), DepType::Blocks));

    let hits = search(&state, "dep_type_in:blocks");
    assert_eq!(hits, vec![id("tsq-bbbbbbbb")]);

    let hits = search(&state, "dep_type_out:blocks");
    assert_eq!(hits, vec![id("tsq-aaaaaaaa")]);
}

#[test]
fn bare_dep_type_without_direction_is_rejected() {
    assert!(parse("dep_type:blocks").is_err());
}

#[test]
fn unknown_dep_type_value_is_rejected() {
    assert!(parse("dep_type_in:nonsense").is_err());
}
