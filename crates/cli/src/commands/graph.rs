// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency edge, relation link, and label mutation commands.

use super::common::{self, Ctx};
use serde_json::Value;
use tsq_core::error::TsqError;
use tsq_core::event::{DepChangedPayload, EventRecord, EventType, LabelChangedPayload, LinkChangedPayload};
use tsq_core::id::EventId;

use crate::cli::{DepCommand, LabelCommand, LinkCommand};

pub fn dep(ctx: &Ctx, cmd: &DepCommand) -> Result<Value, TsqError> {
    match cmd {
        DepCommand::Add { id, blocker, dep_type } => dep_change(ctx, id, blocker, (*dep_type).into(), EventType::DepAdded),
        DepCommand::Remove { id, blocker, dep_type } => {
            dep_change(ctx, id, blocker, (*dep_type).into(), EventType::DepRemoved)
        }
    }
}

fn dep_change(
    ctx: &Ctx,
    raw_id: &str,
    raw_blocker: &str,
    dep_type: tsq_core::dep::DepType,
    event_type: EventType,
) -> Result<Value, TsqError> {
    let (state, _events) = common::mutate(ctx, move |state, actor, now| {
        let id = tsq_engine::resolve_id(state, raw_id, ctx.exact_id)?;
        let blocker = tsq_engine::resolve_id(state, raw_blocker, ctx.exact_id)?;
        let payload = DepChangedPayload::new(blocker, dep_type);
        Ok(vec![EventRecord::new(EventId(0), now, actor, event_type, Some(id), common::to_payload(&payload))])
    })?;

    let id = common::resolve(ctx, &state, raw_id)?;
    common::task_value(&state, &id)
}

pub fn link(ctx: &Ctx, cmd: &LinkCommand) -> Result<Value, TsqError> {
    match cmd {
        LinkCommand::Add { id, to, kind } => link_change(ctx, id, to, (*kind).into(), EventType::LinkAdded),
        LinkCommand::Remove { id, to, kind } => link_change(ctx, id, to, (*kind).into(), EventType::LinkRemoved),
    }
}

fn link_change(
    ctx: &Ctx,
    raw_id: &str,
    raw_to: &str,
    kind: tsq_core::link::RelationKind,
    event_type: EventType,
) -> Result<Value, TsqError> {
    let (state, _events) = common::mutate(ctx, move |state, actor, now| {
        let id = tsq_engine::resolve_id(state, raw_id, ctx.exact_id)?;
        let to = tsq_engine::resolve_id(state, raw_to, ctx.exact_id)?;
        let payload = LinkChangedPayload { to, kind };
        Ok(vec![EventRecord::new(EventId(0), now, actor, event_type, Some(id), common::to_payload(&payload))])
    })?;

    let id = common::resolve(ctx, &state, raw_id)?;
    common::task_value(&state, &id)
}

pub fn label(ctx: &Ctx, cmd: &LabelCommand) -> Result<Value, TsqError> {
    match cmd {
        LabelCommand::Add { id, label } => label_change(ctx, id, label, EventType::LabelAdded),
        LabelCommand::Remove { id, label } => label_change(ctx, id, label, EventType::LabelRemoved),
    }
}

fn label_change(ctx: &Ctx, raw_id: &str, raw_label: &str, event_type: EventType) -> Result<Value, TsqError> {
    let (state, _events) = common::mutate(ctx, move |state, actor, now| {
        let id = tsq_engine::resolve_id(state, raw_id, ctx.exact_id)?;
        let payload = LabelChangedPayload { label: raw_label.to_string() };
        Ok(vec![EventRecord::new(EventId(0), now, actor, event_type, Some(id), common::to_payload(&payload))])
    })?;

    let id = common::resolve(ctx, &state, raw_id)?;
    common::task_value(&state, &id)
}
