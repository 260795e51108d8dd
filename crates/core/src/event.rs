// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The event log's wire format.
//!
//! Grounded on `oj::event::Event`'s `#[serde(tag = "type")]` enum, but
//! flattened to the single `EventRecord{event_id, ts, actor, type, task_id,
//! payload}` envelope the log actually stores on disk, with a typed payload
//! per event kind parsed out of the generic JSON map at projection time.
//! The `#[serde(other)]` catch-all on [`EventType`] keeps a log written by a
//! newer binary readable by an older one.

use crate::dep::DepType;
use crate::id::{EventId, TaskId};
use crate::link::RelationKind;
use crate::task::{PlanningState, Priority, TaskKind, TaskStatus};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The event kinds a store can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[serde(rename = "task.created")]
    TaskCreated,
    #[serde(rename = "task.updated")]
    TaskUpdated,
    #[serde(rename = "task.claimed")]
    TaskClaimed,
    #[serde(rename = "task.closed")]
    TaskClosed,
    #[serde(rename = "task.reopened")]
    TaskReopened,
    #[serde(rename = "task.superseded")]
    TaskSuperseded,
    #[serde(rename = "task.duplicated")]
    TaskDuplicated,
    #[serde(rename = "note.added")]
    NoteAdded,
    #[serde(rename = "dep.added")]
    DepAdded,
    #[serde(rename = "dep.removed")]
    DepRemoved,
    #[serde(rename = "link.added")]
    LinkAdded,
    #[serde(rename = "link.removed")]
    LinkRemoved,
    #[serde(rename = "label.added")]
    LabelAdded,
    #[serde(rename = "label.removed")]
    LabelRemoved,
    #[serde(rename = "spec.attached")]
    SpecAttached,
    #[serde(rename = "repair.applied")]
    RepairApplied,
    /// An event type this binary does not recognize. Carried through
    /// untouched so a log written by a newer `tsq` stays readable; the
    /// projector skips these with a warning rather than failing the load.
    #[serde(other)]
    Unknown,
}

crate::simple_display! {
    EventType {
        TaskCreated => "task.created",
        TaskUpdated => "task.updated",
        TaskClaimed => "task.claimed",
        TaskClosed => "task.closed",
        TaskReopened => "task.reopened",
        TaskSuperseded => "task.superseded",
        TaskDuplicated => "task.duplicated",
        NoteAdded => "note.added",
        DepAdded => "dep.added",
        DepRemoved => "dep.removed",
        LinkAdded => "link.added",
        LinkRemoved => "link.removed",
        LabelAdded => "label.added",
        LabelRemoved => "label.removed",
        SpecAttached => "spec.attached",
        RepairApplied => "repair.applied",
        Unknown => "unknown",
    }
}

/// One record as it is appended to and read from the log.
///
/// `payload` is a generic JSON map — not a typed enum — so an event with
/// fields this binary has never seen still round-trips losslessly through
/// append/read/snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_id: EventId,
    pub ts: String,
    pub actor: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    #[serde(default)]
    pub payload: Map<String, Value>,
}

impl EventRecord {
    pub fn new(
        event_id: EventId,
        ts: impl Into<String>,
        actor: impl Into<String>,
        event_type: EventType,
        task_id: Option<TaskId>,
        payload: Map<String, Value>,
    ) -> Self {
        Self { event_id, ts: ts.into(), actor: actor.into(), event_type, task_id, payload }
    }
}

/// Typed view of `task.created`'s payload, parsed out of the generic map by
/// the projector. Keeps the reducer free of raw `Value` indexing.
///
/// Also `Serialize`: the command layer builds one of these directly rather
/// than assembling a raw `serde_json::Map` by hand, then turns it into the
/// generic payload map with `serde_json::to_value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCreatedPayload {
    pub kind: TaskKind,
    pub title: String,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub parent_id: Option<TaskId>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub external_ref: Option<String>,
    #[serde(default)]
    pub discovered_from: Option<TaskId>,
    #[serde(default)]
    pub planning_state: Option<PlanningState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskUpdatedPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub external_ref: Option<String>,
    #[serde(default)]
    pub planning_state: Option<PlanningState>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskClaimedPayload {
    pub assignee: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TaskClosedPayload {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSupersededPayload {
    pub superseded_by: TaskId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDuplicatedPayload {
    pub duplicate_of: TaskId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteAddedPayload {
    pub text: String,
}

/// `dep.added`/`dep.removed` payload. Accepts three wire shapes on read: the
/// current `{blocker, dep_type}` object; an older `{blocker}` object missing
/// `dep_type` (from logs written before the field existed); and a bare
/// `"tsq-..."` string. All of these imply `dep_type = blocks`. New events are
/// always written in the full typed shape; legacy shapes are normalized to it
/// via [`DepChangedPayload::blocker`] and [`DepChangedPayload::dep_type`] as
/// soon as they're read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DepChangedPayload {
    Typed {
        blocker: TaskId,
        #[serde(default = "DepType::blocks")]
        dep_type: DepType,
    },
    LegacyBlocker(TaskId),
}

impl DepChangedPayload {
    pub fn new(blocker: TaskId, dep_type: DepType) -> Self {
        DepChangedPayload::Typed { blocker, dep_type }
    }

    pub fn blocker(&self) -> &TaskId {
        match self {
            DepChangedPayload::Typed { blocker, .. } => blocker,
            DepChangedPayload::LegacyBlocker(blocker) => blocker,
        }
    }

    pub fn dep_type(&self) -> DepType {
        match self {
            DepChangedPayload::Typed { dep_type, .. } => *dep_type,
            DepChangedPayload::LegacyBlocker(_) => DepType::Blocks,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkChangedPayload {
    pub to: TaskId,
    pub kind: RelationKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelChangedPayload {
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecAttachedPayload {
    pub spec_path: String,
    pub spec_fingerprint: String,
    pub spec_attached_by: String,
}

/// One item of a repair plan: either an orphan dep or orphan link removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RepairItem {
    OrphanDep { task_id: TaskId, blocker: TaskId, dep_type: DepType },
    OrphanLink { task_id: TaskId, to: TaskId, kind: RelationKind },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairAppliedPayload {
    pub items: Vec<RepairItem>,
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
