// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency edges between tasks.

use crate::id::TaskId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepType {
    /// `from` cannot be closed until `to` is closed or canceled.
    Blocks,
    /// `from` cannot be claimed until `to` has entered `in_progress` or later.
    StartsAfter,
}

crate::simple_display! {
    DepType {
        Blocks => "blocks",
        StartsAfter => "starts_after",
    }
}

impl DepType {
    /// Default for dependency edges that predate the `dep_type` field.
    pub fn blocks() -> Self {
        DepType::Blocks
    }
}

/// A directed dependency edge: `from` depends on `to`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: TaskId,
    pub to: TaskId,
    pub dep_type: DepType,
}

impl DependencyEdge {
    pub fn new(from: TaskId, to: TaskId, dep_type: DepType) -> Self {
        Self { from, to, dep_type }
    }

    /// A self-edge is always rejected before it reaches the log.
    pub fn is_self_edge(&self) -> bool {
        self.from == self.to
    }
}
