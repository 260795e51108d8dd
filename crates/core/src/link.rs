// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Non-blocking relation links between tasks.

use crate::id::TaskId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    RelatesTo,
    RepliesTo,
    Duplicates,
    Supersedes,
}

crate::simple_display! {
    RelationKind {
        RelatesTo => "relates_to",
        RepliesTo => "replies_to",
        Duplicates => "duplicates",
        Supersedes => "supersedes",
    }
}

impl RelationKind {
    /// `duplicates` and `supersedes` links participate in cycle detection;
    /// the others are purely informational.
    pub fn is_cycle_checked(self) -> bool {
        matches!(self, RelationKind::Duplicates | RelationKind::Supersedes)
    }
}

/// A directed, non-blocking relation between two tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationLink {
    pub from: TaskId,
    pub to: TaskId,
    pub kind: RelationKind,
}

impl RelationLink {
    pub fn new(from: TaskId, to: TaskId, kind: RelationKind) -> Self {
        Self { from, to, kind }
    }

    pub fn is_self_edge(&self) -> bool {
        self.from == self.to
    }
}
