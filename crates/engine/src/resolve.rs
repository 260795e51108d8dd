// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves a user-supplied id or id prefix to a concrete [`TaskId`]; every
//! operation accepting `<id>` accepts a prefix.

use crate::error::ValidationError;
use tsq_core::id::TaskId;
use tsq_core::state::State;

/// Resolve `input` to a task id. An exact match always wins outright; when
/// `exact` is false and there is no exact match, `input` is treated as a
/// prefix and must match exactly one known id.
pub fn resolve_id(state: &State, input: &str, exact: bool) -> Result<TaskId, ValidationError> {
    let candidate = TaskId::from_string(input);
    if state.contains(&candidate) {
        return Ok(candidate);
    }
    if exact {
        return Err(ValidationError::TaskNotFound(candidate));
    }

    let matches: Vec<TaskId> =
        state.created_order.iter().filter(|id| id.as_str().starts_with(input)).cloned().collect();

    match matches.len() {
        0 => Err(ValidationError::TaskNotFound(candidate)),
        1 => Ok(matches[0].clone()),
        count => Err(ValidationError::TaskIdAmbiguous {
            prefix: input.to_string(),
            candidates: matches,
            count,
        }),
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
