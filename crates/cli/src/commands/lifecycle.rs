// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task lifecycle commands: create, update, claim, close,
//! reopen, supersede, duplicate, merge.

use super::common::{self, Ctx};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use tsq_core::error::{ErrorCode, TsqError};
use tsq_core::event::{
    EventRecord, EventType, TaskClaimedPayload, TaskClosedPayload, TaskCreatedPayload,
    TaskDuplicatedPayload, TaskSupersededPayload, TaskUpdatedPayload,
};
use tsq_core::id::{EventId, TaskId};
use tsq_engine::ValidationError;

use crate::cli::{ClaimArgs, CloseArgs, CreateArgs, DuplicateArgs, MergeArgs, ReopenArgs, SupersedeArgs, UpdateArgs};

pub fn create(ctx: &Ctx, args: &CreateArgs) -> Result<Value, TsqError> {
    let predicted: Rc<RefCell<Option<TaskId>>> = Rc::new(RefCell::new(None));
    let predicted_build = Rc::clone(&predicted);

    let (state, _events) = common::mutate(ctx, move |state, actor, now| {
        let parent_id = match &args.parent {
            Some(raw) => Some(tsq_engine::resolve_id(state, raw, ctx.exact_id)?),
            None => None,
        };
        let discovered_from = match &args.discovered_from {
            Some(raw) => Some(tsq_engine::resolve_id(state, raw, ctx.exact_id)?),
            None => None,
        };

        let new_id = match &parent_id {
            Some(parent) => {
                let mut probe = state.clone();
                tsq_engine::alloc_child_id(&mut probe, parent)
                    .ok_or_else(|| ValidationError::TaskNotFound(parent.clone()))?
            }
            None => TaskId::new_root(),
        };
        *predicted_build.borrow_mut() = Some(new_id.clone());

        let payload = TaskCreatedPayload {
            kind: args.kind.into(),
            title: args.title.clone(),
            priority: args.priority,
            parent_id: parent_id.clone(),
            description: args.description.clone(),
            external_ref: args.external_ref.clone(),
            discovered_from,
            planning_state: args.planning_state.map(Into::into),
        };
        let event_task_id = if parent_id.is_some() { None } else { Some(new_id) };
        Ok(vec![EventRecord::new(
            EventId(0),
            now,
            actor,
            EventType::TaskCreated,
            event_task_id,
            common::to_payload(&payload),
        )])
    })?;

    let id = predicted
        .borrow()
        .clone()
        .ok_or_else(|| TsqError::new(ErrorCode::InternalError, "create did not record the new task id"))?;
    common::task_value(&state, &id)
}

pub fn update(ctx: &Ctx, args: &UpdateArgs) -> Result<Value, TsqError> {
    let (state, _events) = common::mutate(ctx, |state, actor, now| {
        let id = tsq_engine::resolve_id(state, &args.id, ctx.exact_id)?;
        let payload = TaskUpdatedPayload {
            title: args.title.clone(),
            status: args.status.map(Into::into),
            priority: args.priority,
            description: args.description.clone(),
            external_ref: args.external_ref.clone(),
            planning_state: args.planning_state.map(Into::into),
        };
        Ok(vec![EventRecord::new(EventId(0), now, actor, EventType::TaskUpdated, Some(id), common::to_payload(&payload))])
    })?;

    let id = common::resolve(ctx, &state, &args.id)?;
    common::task_value(&state, &id)
}

pub fn claim(ctx: &Ctx, args: &ClaimArgs) -> Result<Value, TsqError> {
    let (state, _events) = common::mutate(ctx, |state, actor, now| {
        let id = tsq_engine::resolve_id(state, &args.id, ctx.exact_id)?;
        if args.require_spec {
            let task = state.get(&id).ok_or_else(|| ValidationError::TaskNotFound(id.clone()))?;
            if task.spec_path.is_none() {
                return Err(ValidationError::SpecRequired(id));
            }
        }
        let payload = TaskClaimedPayload { assignee: args.assignee.clone() };
        Ok(vec![EventRecord::new(EventId(0), now, actor, EventType::TaskClaimed, Some(id), common::to_payload(&payload))])
    })?;

    let id = common::resolve(ctx, &state, &args.id)?;
    common::task_value(&state, &id)
}

pub fn close(ctx: &Ctx, args: &CloseArgs) -> Result<Value, TsqError> {
    let (state, _events) = common::mutate(ctx, |state, actor, now| {
        let mut events = Vec::with_capacity(args.ids.len());
        for raw in &args.ids {
            let id = tsq_engine::resolve_id(state, raw, ctx.exact_id)?;
            let payload = TaskClosedPayload { reason: args.reason.clone() };
            events.push(EventRecord::new(EventId(0), now, actor, EventType::TaskClosed, Some(id), common::to_payload(&payload)));
        }
        Ok(events)
    })?;

    let ids: Vec<TaskId> = args.ids.iter().map(|raw| common::resolve(ctx, &state, raw)).collect::<Result<_, _>>()?;
    Ok(Value::Array(common::tasks_value_vec(&state, &ids)?))
}

pub fn reopen(ctx: &Ctx, args: &ReopenArgs) -> Result<Value, TsqError> {
    let (state, _events) = common::mutate(ctx, |state, actor, now| {
        let mut events = Vec::with_capacity(args.ids.len());
        for raw in &args.ids {
            let id = tsq_engine::resolve_id(state, raw, ctx.exact_id)?;
            events.push(EventRecord::new(EventId(0), now, actor, EventType::TaskReopened, Some(id), Default::default()));
        }
        Ok(events)
    })?;

    let ids: Vec<TaskId> = args.ids.iter().map(|raw| common::resolve(ctx, &state, raw)).collect::<Result<_, _>>()?;
    Ok(Value::Array(common::tasks_value_vec(&state, &ids)?))
}

pub fn supersede(ctx: &Ctx, args: &SupersedeArgs) -> Result<Value, TsqError> {
    let (state, _events) = common::mutate(ctx, |state, actor, now| {
        let id = tsq_engine::resolve_id(state, &args.id, ctx.exact_id)?;
        let by = tsq_engine::resolve_id(state, &args.by, ctx.exact_id)?;
        if id == by {
            return Err(ValidationError::Generic(format!("cannot supersede {id} with itself")));
        }
        let payload = TaskSupersededPayload { superseded_by: by };
        Ok(vec![EventRecord::new(EventId(0), now, actor, EventType::TaskSuperseded, Some(id), common::to_payload(&payload))])
    })?;

    let id = common::resolve(ctx, &state, &args.id)?;
    common::task_value(&state, &id)
}

pub fn duplicate(ctx: &Ctx, args: &DuplicateArgs) -> Result<Value, TsqError> {
    let (state, _events) = common::mutate(ctx, |state, actor, now| {
        let id = tsq_engine::resolve_id(state, &args.id, ctx.exact_id)?;
        let of = tsq_engine::resolve_id(state, &args.of, ctx.exact_id)?;
        if id == of {
            return Err(ValidationError::Generic(format!("cannot mark {id} as a duplicate of itself")));
        }
        if tsq_engine::would_create_duplicate_cycle(state, &id, &of) {
            return Err(ValidationError::DuplicateCycle);
        }
        let payload = TaskDuplicatedPayload { duplicate_of: of };
        Ok(vec![EventRecord::new(EventId(0), now, actor, EventType::TaskDuplicated, Some(id), common::to_payload(&payload))])
    })?;

    let id = common::resolve(ctx, &state, &args.id)?;
    common::task_value(&state, &id)
}

/// `merge` folds `sources` into `into` as a single atomic batch of
/// `task.duplicated` events. `--dry-run` runs the same cycle/self-edge
/// checks against a freshly loaded (unlocked) state and previews the result
/// without appending anything.
pub fn merge(ctx: &Ctx, args: &MergeArgs) -> Result<Value, TsqError> {
    if args.dry_run {
        let loaded = common::load(ctx)?;
        let canonical = common::resolve(ctx, &loaded.state, &args.into)?;
        let mut preview = Vec::with_capacity(args.sources.len());
        for raw in &args.sources {
            let source = common::resolve(ctx, &loaded.state, raw)?;
            if source == canonical {
                return Err(TsqError::new(ErrorCode::ValidationError, format!("cannot merge {source} into itself")));
            }
            if tsq_engine::would_create_duplicate_cycle(&loaded.state, &source, &canonical) {
                return Err(ValidationError::DuplicateCycle.into());
            }
            preview.push(serde_json::json!({ "source": source, "canonical": canonical }));
        }
        return Ok(serde_json::json!({ "dry_run": true, "merges": preview }));
    }

    let (state, _events) = common::mutate(ctx, |state, actor, now| {
        let canonical = tsq_engine::resolve_id(state, &args.into, ctx.exact_id)?;
        let mut events = Vec::with_capacity(args.sources.len());
        for raw in &args.sources {
            let source = tsq_engine::resolve_id(state, raw, ctx.exact_id)?;
            if source == canonical {
                return Err(ValidationError::Generic(format!("cannot merge {source} into itself")));
            }
            let payload = TaskDuplicatedPayload { duplicate_of: canonical.clone() };
            events.push(EventRecord::new(
                EventId(0),
                now,
                actor,
                EventType::TaskDuplicated,
                Some(source),
                common::to_payload(&payload),
            ));
        }
        Ok(events)
    })?;

    let canonical = common::resolve(ctx, &state, &args.into)?;
    let sources: Vec<TaskId> = args.sources.iter().map(|raw| common::resolve(ctx, &state, raw)).collect::<Result<_, _>>()?;
    Ok(serde_json::json!({
        "canonical": common::task_value(&state, &canonical)?,
        "merged": common::tasks_value_vec(&state, &sources)?,
    }))
}
