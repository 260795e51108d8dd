// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Folds [`EventRecord`]s into a [`State`].
//!
//! Grounded on `oj-storage::state::MaterializedState::apply_event`'s
//! dispatch-by-tag shape, but split into two entry points with different
//! failure policies for replay robustness:
//!
//! - [`apply_replay`] never aborts: a precondition failure or unknown event
//!   type is recorded as a warning and the event is skipped.
//! - [`apply_live`] is used by the command layer building a *new* event; a
//!   precondition failure there is a hard [`ValidationError`] rejected
//!   before the event ever reaches the log.
//!
//! Both route through the same per-event-type reducer so there is exactly
//! one place that knows what `task.claimed` means.

use crate::error::ValidationError;
use crate::graph;
use crate::id_alloc::alloc_child_id;
use serde_json::Value;
use tsq_core::dep::DependencyEdge;
use tsq_core::event::{
    DepChangedPayload, EventRecord, EventType, LabelChangedPayload, LinkChangedPayload,
    NoteAddedPayload, RepairAppliedPayload, RepairItem, SpecAttachedPayload, TaskClaimedPayload,
    TaskClosedPayload, TaskCreatedPayload, TaskDuplicatedPayload, TaskSupersededPayload,
    TaskUpdatedPayload,
};
use tsq_core::link::RelationLink;
use tsq_core::state::State;
use tsq_core::task::{Label, Note, Task, TaskStatus};

/// Apply one event during replay: never returns `Err`, but returns `Some`
/// warning text when the event's precondition failed and it was skipped.
pub fn apply_replay(state: &mut State, record: &EventRecord) -> Option<String> {
    match apply_live(state, record) {
        Ok(()) => {
            state.bump_applied();
            None
        }
        Err(err) => Some(format!(
            "event {} ({}) skipped during replay: {err}",
            record.event_id, record.event_type
        )),
    }
}

/// Apply one event, rejecting on a precondition failure. Used both by
/// replay (wrapped by [`apply_replay`]) and by the command layer validating
/// a just-built event before it is appended.
pub fn apply_live(state: &mut State, record: &EventRecord) -> Result<(), ValidationError> {
    let payload = Value::Object(record.payload.clone());
    match record.event_type {
        EventType::TaskCreated => apply_task_created(state, record, payload),
        EventType::TaskUpdated => apply_task_updated(state, record, payload),
        EventType::TaskClaimed => apply_task_claimed(state, record, payload),
        EventType::TaskClosed => apply_task_closed(state, record, payload),
        EventType::TaskReopened => apply_task_reopened(state, record),
        EventType::TaskSuperseded => apply_task_superseded(state, record, payload),
        EventType::TaskDuplicated => apply_task_duplicated(state, record, payload),
        EventType::DepAdded => apply_dep_added(state, record, payload),
        EventType::DepRemoved => apply_dep_removed(state, record, payload),
        EventType::LinkAdded => apply_link_added(state, record, payload),
        EventType::LinkRemoved => apply_link_removed(state, record, payload),
        EventType::LabelAdded => apply_label_added(state, record, payload),
        EventType::LabelRemoved => apply_label_removed(state, record, payload),
        EventType::SpecAttached => apply_spec_attached(state, record, payload),
        EventType::NoteAdded => apply_note_added(state, record, payload),
        EventType::RepairApplied => apply_repair_applied(state, payload),
        // Forward-compatibility: an event type this binary doesn't know
        // about carries no semantics it can apply.
        EventType::Unknown => Ok(()),
    }
}

fn parse<T: serde::de::DeserializeOwned>(payload: Value) -> Result<T, ValidationError> {
    serde_json::from_value(payload)
        .map_err(|e| ValidationError::Generic(format!("malformed payload: {e}")))
}

fn require_task<'s>(state: &'s State, id: &tsq_core::id::TaskId) -> Result<&'s Task, ValidationError> {
    state.get(id).ok_or_else(|| ValidationError::TaskNotFound(id.clone()))
}

fn apply_task_created(state: &mut State, record: &EventRecord, payload: Value) -> Result<(), ValidationError> {
    let fields: TaskCreatedPayload = parse(payload)?;

    let id = match &fields.parent_id {
        Some(parent) => alloc_child_id(state, parent)
            .ok_or_else(|| ValidationError::TaskNotFound(parent.clone()))?,
        None => record
            .task_id
            .clone()
            .ok_or_else(|| ValidationError::Generic("task.created missing task_id".into()))?,
    };
    if state.contains(&id) {
        return Err(ValidationError::Generic(format!("duplicate task id {id}")));
    }

    let task = Task {
        id,
        kind: fields.kind,
        title: fields.title,
        status: TaskStatus::Open,
        priority: fields.priority.unwrap_or_default(),
        labels: Default::default(),
        notes: Vec::new(),
        planning_state: fields.planning_state.unwrap_or_default(),
        assignee: None,
        parent_id: fields.parent_id,
        description: fields.description,
        external_ref: fields.external_ref,
        discovered_from: fields.discovered_from,
        superseded_by: None,
        duplicate_of: None,
        closed_at: None,
        spec_path: None,
        spec_fingerprint: None,
        spec_attached_at: None,
        spec_attached_by: None,
        created_at: record.ts.clone(),
        updated_at: record.ts.clone(),
    };
    state.insert_task(task);
    Ok(())
}

fn apply_task_updated(state: &mut State, record: &EventRecord, payload: Value) -> Result<(), ValidationError> {
    let task_id = record.task_id.clone().ok_or_else(|| ValidationError::Generic("missing task_id".into()))?;
    let fields: TaskUpdatedPayload = parse(payload)?;
    let task = state.tasks.get_mut(&task_id).ok_or_else(|| ValidationError::TaskNotFound(task_id.clone()))?;

    if let Some(title) = fields.title {
        task.title = title;
    }
    if let Some(status) = fields.status {
        task.status = status;
    }
    if let Some(priority) = fields.priority {
        task.priority = priority;
    }
    if let Some(description) = fields.description {
        task.description = Some(description);
    }
    if let Some(external_ref) = fields.external_ref {
        task.external_ref = Some(external_ref);
    }
    if let Some(planning_state) = fields.planning_state {
        task.planning_state = planning_state;
    }
    task.updated_at = record.ts.clone();
    Ok(())
}

fn apply_task_claimed(state: &mut State, record: &EventRecord, payload: Value) -> Result<(), ValidationError> {
    let task_id = record.task_id.clone().ok_or_else(|| ValidationError::Generic("missing task_id".into()))?;
    let fields: TaskClaimedPayload = parse(payload)?;
    let task = state.tasks.get_mut(&task_id).ok_or_else(|| ValidationError::TaskNotFound(task_id.clone()))?;

    if !task.status.is_workable() {
        return Err(ValidationError::InvalidStatus(task_id));
    }
    if let Some(existing) = &task.assignee {
        if existing != &fields.assignee {
            return Err(ValidationError::ClaimConflict(task_id, existing.clone()));
        }
    }
    task.assignee = Some(fields.assignee);
    if task.status == TaskStatus::Open {
        task.status = TaskStatus::InProgress;
    }
    task.updated_at = record.ts.clone();
    Ok(())
}

fn apply_task_closed(state: &mut State, record: &EventRecord, payload: Value) -> Result<(), ValidationError> {
    let task_id = record.task_id.clone().ok_or_else(|| ValidationError::Generic("missing task_id".into()))?;
    let _fields: TaskClosedPayload = parse(payload)?;
    let task = state.tasks.get_mut(&task_id).ok_or_else(|| ValidationError::TaskNotFound(task_id.clone()))?;

    if task.is_closed_like() {
        return Err(ValidationError::InvalidStatus(task_id));
    }
    task.status = TaskStatus::Closed;
    task.closed_at = Some(record.ts.clone());
    task.updated_at = record.ts.clone();
    Ok(())
}

fn apply_task_reopened(state: &mut State, record: &EventRecord) -> Result<(), ValidationError> {
    let task_id = record.task_id.clone().ok_or_else(|| ValidationError::Generic("missing task_id".into()))?;
    let task = state.tasks.get_mut(&task_id).ok_or_else(|| ValidationError::TaskNotFound(task_id.clone()))?;

    if task.status != TaskStatus::Closed {
        return Err(ValidationError::InvalidStatus(task_id));
    }
    task.status = TaskStatus::Open;
    task.closed_at = None;
    task.updated_at = record.ts.clone();
    Ok(())
}

fn apply_task_superseded(state: &mut State, record: &EventRecord, payload: Value) -> Result<(), ValidationError> {
    let task_id = record.task_id.clone().ok_or_else(|| ValidationError::Generic("missing task_id".into()))?;
    let fields: TaskSupersededPayload = parse(payload)?;
    require_task(state, &fields.superseded_by)?;

    let task = state.tasks.get_mut(&task_id).ok_or_else(|| ValidationError::TaskNotFound(task_id.clone()))?;
    if task.is_closed_like() {
        return Err(ValidationError::InvalidStatus(task_id));
    }
    task.superseded_by = Some(fields.superseded_by.clone());
    task.status = TaskStatus::Closed;
    task.closed_at = Some(record.ts.clone());
    task.updated_at = record.ts.clone();

    state.add_link(RelationLink::new(task_id, fields.superseded_by, tsq_core::link::RelationKind::Supersedes));
    Ok(())
}

fn apply_task_duplicated(state: &mut State, record: &EventRecord, payload: Value) -> Result<(), ValidationError> {
    let task_id = record.task_id.clone().ok_or_else(|| ValidationError::Generic("missing task_id".into()))?;
    let fields: TaskDuplicatedPayload = parse(payload)?;
    require_task(state, &fields.duplicate_of)?;

    if graph::would_create_duplicate_cycle(state, &task_id, &fields.duplicate_of) {
        return Err(ValidationError::DuplicateCycle);
    }

    let task = state.tasks.get_mut(&task_id).ok_or_else(|| ValidationError::TaskNotFound(task_id.clone()))?;
    if task.is_closed_like() {
        return Err(ValidationError::InvalidStatus(task_id.clone()));
    }
    task.duplicate_of = Some(fields.duplicate_of.clone());
    task.status = TaskStatus::Closed;
    task.closed_at = Some(record.ts.clone());
    task.updated_at = record.ts.clone();

    state.add_link(RelationLink::new(task_id, fields.duplicate_of, tsq_core::link::RelationKind::Duplicates));
    Ok(())
}

fn apply_dep_added(state: &mut State, record: &EventRecord, payload: Value) -> Result<(), ValidationError> {
    let task_id = record.task_id.clone().ok_or_else(|| ValidationError::Generic("missing task_id".into()))?;
    let fields: DepChangedPayload = parse(payload)?;
    let (blocker, dep_type) = (fields.blocker().clone(), fields.dep_type());
    require_task(state, &task_id)?;
    require_task(state, &blocker)?;

    if task_id == blocker {
        return Err(ValidationError::SelfEdge(task_id));
    }
    if dep_type == tsq_core::dep::DepType::Blocks && graph::would_create_cycle(state, &task_id, &blocker) {
        return Err(ValidationError::DependencyCycle);
    }

    state.add_dep(DependencyEdge::new(task_id, blocker, dep_type));
    Ok(())
}

fn apply_dep_removed(state: &mut State, record: &EventRecord, payload: Value) -> Result<(), ValidationError> {
    let task_id = record.task_id.clone().ok_or_else(|| ValidationError::Generic("missing task_id".into()))?;
    let fields: DepChangedPayload = parse(payload)?;
    state.remove_dep(&DependencyEdge::new(task_id, fields.blocker().clone(), fields.dep_type()));
    Ok(())
}

fn apply_link_added(state: &mut State, record: &EventRecord, payload: Value) -> Result<(), ValidationError> {
    let task_id = record.task_id.clone().ok_or_else(|| ValidationError::Generic("missing task_id".into()))?;
    let fields: LinkChangedPayload = parse(payload)?;
    require_task(state, &task_id)?;
    require_task(state, &fields.to)?;
    if task_id == fields.to {
        return Err(ValidationError::SelfEdge(task_id));
    }
    state.add_link(RelationLink::new(task_id, fields.to, fields.kind));
    Ok(())
}

fn apply_link_removed(state: &mut State, record: &EventRecord, payload: Value) -> Result<(), ValidationError> {
    let task_id = record.task_id.clone().ok_or_else(|| ValidationError::Generic("missing task_id".into()))?;
    let fields: LinkChangedPayload = parse(payload)?;
    state.remove_link(&RelationLink::new(task_id, fields.to, fields.kind));
    Ok(())
}

fn apply_label_added(state: &mut State, record: &EventRecord, payload: Value) -> Result<(), ValidationError> {
    let task_id = record.task_id.clone().ok_or_else(|| ValidationError::Generic("missing task_id".into()))?;
    let fields: LabelChangedPayload = parse(payload)?;
    let label = Label::parse(&fields.label).map_err(ValidationError::Generic)?;
    let task = state.tasks.get_mut(&task_id).ok_or_else(|| ValidationError::TaskNotFound(task_id.clone()))?;
    task.labels.insert(label);
    task.updated_at = record.ts.clone();
    Ok(())
}

fn apply_label_removed(state: &mut State, record: &EventRecord, payload: Value) -> Result<(), ValidationError> {
    let task_id = record.task_id.clone().ok_or_else(|| ValidationError::Generic("missing task_id".into()))?;
    let fields: LabelChangedPayload = parse(payload)?;
    let label = Label::parse(&fields.label).map_err(ValidationError::Generic)?;
    let task = state.tasks.get_mut(&task_id).ok_or_else(|| ValidationError::TaskNotFound(task_id.clone()))?;
    task.labels.remove(&label);
    task.updated_at = record.ts.clone();
    Ok(())
}

fn apply_spec_attached(state: &mut State, record: &EventRecord, payload: Value) -> Result<(), ValidationError> {
    let task_id = record.task_id.clone().ok_or_else(|| ValidationError::Generic("missing task_id".into()))?;
    let fields: SpecAttachedPayload = parse(payload)?;
    let task = state.tasks.get_mut(&task_id).ok_or_else(|| ValidationError::TaskNotFound(task_id.clone()))?;
    task.spec_path = Some(fields.spec_path);
    task.spec_fingerprint = Some(fields.spec_fingerprint);
    task.spec_attached_at = Some(record.ts.clone());
    task.spec_attached_by = Some(fields.spec_attached_by);
    task.updated_at = record.ts.clone();
    Ok(())
}

fn apply_note_added(state: &mut State, record: &EventRecord, payload: Value) -> Result<(), ValidationError> {
    let task_id = record.task_id.clone().ok_or_else(|| ValidationError::Generic("missing task_id".into()))?;
    let fields: NoteAddedPayload = parse(payload)?;
    let task = state.tasks.get_mut(&task_id).ok_or_else(|| ValidationError::TaskNotFound(task_id.clone()))?;
    task.notes.push(Note {
        event_id: record.event_id,
        ts: record.ts.clone(),
        actor: record.actor.clone(),
        text: fields.text,
    });
    task.updated_at = record.ts.clone();
    Ok(())
}

fn apply_repair_applied(state: &mut State, payload: Value) -> Result<(), ValidationError> {
    let fields: RepairAppliedPayload = parse(payload)?;
    for item in fields.items {
        match item {
            RepairItem::OrphanDep { task_id, blocker, dep_type } => {
                state.remove_dep(&DependencyEdge::new(task_id, blocker, dep_type));
            }
            RepairItem::OrphanLink { task_id, to, kind } => {
                state.remove_link(&RelationLink::new(task_id, to, kind));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "projector_tests.rs"]
mod tests;
