// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task identifiers.
//!
//! A root task gets `tsq-<8 Crockford base32 chars>`. Each child adds one
//! `.<n>` segment, where `n` is allocated from a per-parent monotonic
//! counter (see `tsq-engine::graph::alloc_child_id`). IDs are plain
//! `String`s rather than a fixed-capacity inline buffer, since task IDs
//! grow with task-tree depth and have no fixed upper length.

use std::borrow::Borrow;
use std::fmt;

pub const ID_PREFIX: &str = "tsq-";
pub const ROOT_SUFFIX_LEN: usize = 8;

/// Crockford base32 alphabet: excludes I, L, O, U to avoid visual confusion.
const CROCKFORD_ALPHABET: [char; 32] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J',
    'K', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'V', 'W', 'X', 'Y', 'Z',
];

/// Unique identifier for a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

use serde::{Deserialize, Serialize};

impl TaskId {
    /// Generate a new random root task ID: `tsq-` + 8 Crockford base32 chars.
    pub fn new_root() -> Self {
        let suffix = nanoid::nanoid!(ROOT_SUFFIX_LEN, &CROCKFORD_ALPHABET);
        Self(format!("{ID_PREFIX}{suffix}"))
    }

    /// Build a child ID by appending `.{n}` to a parent ID.
    pub fn child_of(parent: &TaskId, n: u64) -> Self {
        Self(format!("{}.{}", parent.0, n))
    }

    /// Parse an existing string into a `TaskId` (for deserialization / CLI input).
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if this ID has the form of a root task (no `.` segments).
    pub fn is_root(&self) -> bool {
        !self.0.contains('.')
    }

    /// The ID of the immediate parent, if this is a child ID.
    pub fn parent_id(&self) -> Option<TaskId> {
        let (head, _) = self.0.rsplit_once('.')?;
        Some(TaskId(head.to_string()))
    }

    /// Depth of this task in its tree: 0 for roots, 1 for direct children, etc.
    pub fn depth(&self) -> usize {
        self.0.matches('.').count()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self::from_string(s)
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TaskId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for TaskId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TaskId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Globally ordered event identifier within a single store.
///
/// Assigned at append time as the 1-based position of the event in the
/// log: any two events appended by the same process compare in append
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl EventId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
