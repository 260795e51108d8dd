// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tsq_core::test_support::fixture_task;

#[test]
fn exact_match_resolves_directly() {
    let mut state = State::new();
    state.insert_task(fixture_task("tsq-aaaaaaaa", "a"));
    let resolved = resolve_id(&state, "tsq-aaaaaaaa", false).unwrap();
    assert_eq!(resolved.as_str(), "tsq-aaaaaaaa");
}

#[test]
fn unique_prefix_resolves() {
    let mut state = State::new();
    state.insert_task(fixture_task("tsq-aaaaaaaa", "a"));
    let resolved = resolve_id(&state, "tsq-aaaa", false).unwrap();
    assert_eq!(resolved.as_str(), "tsq-aaaaaaaa");
}

#[test]
fn ambiguous_prefix_lists_candidates() {
    let mut state = State::new();
    state.insert_task(fixture_task("tsq-aaaaaaaa", "a"));
    state.insert_task(fixture_task("tsq-aaaabbbb", "b"));

    let err = resolve_id(&state, "tsq-aaaa", false).unwrap_err();
    match err {
        ValidationError::TaskIdAmbiguous { count, candidates, .. } => {
            assert_eq!(count, 2);
            assert_eq!(candidates.len(), 2);
        }
        other => panic!("expected TaskIdAmbiguous, got {other:?}"),
    }
}

#[test]
fn unknown_prefix_is_not_found() {
    let state = State::new();
    assert!(matches!(resolve_id(&state, "tsq-zzzzzzzz", false), Err(ValidationError::TaskNotFound(_))));
}

#[test]
fn exact_flag_disables_prefix_matching() {
    let mut state = State::new();
    state.insert_task(fixture_task("tsq-aaaaaaaa", "a"));
    assert!(matches!(resolve_id(&state, "tsq-aaaa", true), Err(ValidationError::TaskNotFound(_))));
}
