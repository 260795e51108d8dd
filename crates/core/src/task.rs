// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The task node and its constituent value types.

use crate::id::{EventId, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Task,
    Feature,
    Epic,
}

crate::simple_display! {
    TaskKind {
        Task => "task",
        Feature => "feature",
        Epic => "epic",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    InProgress,
    Blocked,
    Closed,
    Canceled,
    Deferred,
}

crate::simple_display! {
    TaskStatus {
        Open => "open",
        InProgress => "in_progress",
        Blocked => "blocked",
        Closed => "closed",
        Canceled => "canceled",
        Deferred => "deferred",
    }
}

impl TaskStatus {
    /// Terminal statuses a blocker must be in to be considered satisfied.
    pub fn satisfies_blocker(self) -> bool {
        matches!(self, TaskStatus::Closed | TaskStatus::Canceled)
    }

    /// Statuses a task must be in to be claimable/ready.
    pub fn is_workable(self) -> bool {
        matches!(self, TaskStatus::Open | TaskStatus::InProgress)
    }
}

/// Priority, 0 (highest) through 3 (lowest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(u8);

impl Priority {
    pub const HIGHEST: Priority = Priority(0);
    pub const LOWEST: Priority = Priority(3);

    pub fn new(value: u8) -> Option<Self> {
        (value <= 3).then_some(Priority(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority(2)
    }
}

/// A lower-cased label matching `[a-z0-9][a-z0-9_-]{0,63}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Normalize and validate a raw label string.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let lower = raw.to_lowercase();
        if lower.is_empty() || lower.len() > 64 {
            return Err(format!("label must be 1-64 characters: {raw:?}"));
        }
        let mut chars = lower.chars();
        let first = chars.next().expect("checked non-empty above");
        if !(first.is_ascii_alphanumeric()) {
            return Err(format!("label must start with [a-z0-9]: {raw:?}"));
        }
        if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(format!("label may only contain [a-z0-9_-]: {raw:?}"));
        }
        Ok(Label(lower))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanningState {
    NeedsPlanning,
    Planned,
}

impl Default for PlanningState {
    fn default() -> Self {
        PlanningState::NeedsPlanning
    }
}

crate::simple_display! {
    PlanningState {
        NeedsPlanning => "needs_planning",
        Planned => "planned",
    }
}

/// A single note attached to a task, in append order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub event_id: EventId,
    pub ts: String,
    pub actor: String,
    pub text: String,
}

/// The fundamental task-graph node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub kind: TaskKind,
    pub title: String,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(default)]
    pub labels: BTreeSet<Label>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub planning_state: PlanningState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovered_from: Option<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_of: Option<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_attached_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_attached_by: Option<String>,

    pub created_at: String,
    pub updated_at: String,
}

impl Task {
    /// True if status is a soft-closed terminal state.
    pub fn is_closed_like(&self) -> bool {
        matches!(self.status, TaskStatus::Closed | TaskStatus::Canceled)
    }
}

#[cfg(any(test, feature = "test-support"))]
crate::builder! {
    pub struct TaskBuilder => Task {
        set {
            id: TaskId = TaskId::new_root(),
            kind: TaskKind = TaskKind::Task,
            status: TaskStatus = TaskStatus::Open,
            priority: Priority = Priority::default(),
            labels: std::collections::BTreeSet<Label> = std::collections::BTreeSet::new(),
            notes: Vec<Note> = Vec::new(),
            planning_state: PlanningState = PlanningState::NeedsPlanning,
            assignee: Option<String> = None,
            parent_id: Option<TaskId> = None,
            description: Option<String> = None,
            external_ref: Option<String> = None,
            discovered_from: Option<TaskId> = None,
            superseded_by: Option<TaskId> = None,
            duplicate_of: Option<TaskId> = None,
            closed_at: Option<String> = None,
            spec_path: Option<String> = None,
            spec_fingerprint: Option<String> = None,
            spec_attached_at: Option<String> = None,
            spec_attached_by: Option<String> = None,
        }
        into {
            title: String = "untitled",
            created_at: String = "2024-01-01T00:00:00.000Z",
            updated_at: String = "2024-01-01T00:00:00.000Z",
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
