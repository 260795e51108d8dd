// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Child task id allocation from a parent's monotonic counter.

use tsq_core::id::TaskId;
use tsq_core::state::State;

/// Allocate the next child id under `parent`, advancing its counter in
/// `state`. Returns `None` if `parent` does not exist.
pub fn alloc_child_id(state: &mut State, parent: &TaskId) -> Option<TaskId> {
    if !state.contains(parent) {
        return None;
    }
    let n = state.next_child_suffix(parent);
    Some(TaskId::child_of(parent, n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsq_core::test_support::fixture_task;

    #[test]
    fn allocates_sequential_children() {
        let mut state = State::new();
        state.insert_task(fixture_task("tsq-aaaaaaaa", "root"));
        let parent = TaskId::from_string("tsq-aaaaaaaa");

        let first = alloc_child_id(&mut state, &parent).unwrap();
        let second = alloc_child_id(&mut state, &parent).unwrap();

        assert_eq!(first.as_str(), "tsq-aaaaaaaa.1");
        assert_eq!(second.as_str(), "tsq-aaaaaaaa.2");
    }

    #[test]
    fn missing_parent_returns_none() {
        let mut state = State::new();
        let parent = TaskId::from_string("tsq-missing1");
        assert!(alloc_child_id(&mut state, &parent).is_none());
    }
}
