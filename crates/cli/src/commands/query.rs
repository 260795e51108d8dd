// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only commands: show, list, ready, stale, history,
//! search, orphans, doctor. None of these touch the lock or the log.

use super::common::{self, Ctx};
use serde_json::Value;
use std::collections::HashSet;
use tsq_core::error::{ErrorCode, TsqError};
use tsq_core::event::EventRecord;
use tsq_core::id::TaskId;
use tsq_core::link::RelationKind;
use tsq_core::state::State;
use tsq_core::task::{Label, TaskStatus};
use tsq_engine::{RepairPlan, TreeNode};

use crate::cli::{HistoryArgs, ListArgs, ReadyArgs, SearchArgs, ShowArgs, StaleArgs};

/// Statuses `stale` reports on by default: anything not already
/// workable-or-blocked is excluded — closed/canceled/deferred tasks
/// aren't "stale", they're just done or parked.
const DEFAULT_STALE_STATUSES: [TaskStatus; 3] = [TaskStatus::Open, TaskStatus::InProgress, TaskStatus::Blocked];

pub fn show(ctx: &Ctx, args: &ShowArgs) -> Result<Value, TsqError> {
    let loaded = common::load(ctx)?;
    let state = &loaded.state;
    let id = common::resolve(ctx, state, &args.id)?;
    let task = common::task_value(state, &id)?;

    let blocker_edges: Vec<Value> =
        state.deps_of(&id).map(|edge| serde_json::json!({ "id": edge.to, "dep_type": edge.dep_type.to_string() })).collect();

    let dependents = tsq_engine::dependents_index(state);
    let dependent_edges: Vec<Value> = dependents
        .get(&id)
        .into_iter()
        .flatten()
        .map(|dependent| serde_json::json!({ "id": dependent.child, "dep_type": dependent.dep_type.to_string() }))
        .collect();

    let mut links = serde_json::Map::new();
    for kind in [RelationKind::RelatesTo, RelationKind::RepliesTo, RelationKind::Duplicates, RelationKind::Supersedes] {
        let targets: Vec<&str> = state.links_of(&id, kind).map(TaskId::as_str).collect();
        if !targets.is_empty() {
            links.insert(kind.to_string(), serde_json::json!(targets));
        }
    }

    let history: Vec<&EventRecord> = loaded.all_events.iter().filter(|event| event_relates_to(event, &id)).collect();

    Ok(serde_json::json!({
        "task": task,
        "blocker_edges": blocker_edges,
        "dependent_edges": dependent_edges,
        "ready": tsq_engine::is_ready(state, &id),
        "links": Value::Object(links),
        "history": history,
    }))
}

pub fn list(ctx: &Ctx, args: &ListArgs) -> Result<Value, TsqError> {
    let loaded = common::load(ctx)?;
    let state = &loaded.state;

    let explicit_ids: Option<HashSet<TaskId>> = if args.ids.is_empty() {
        None
    } else {
        Some(args.ids.iter().map(|raw| common::resolve(ctx, state, raw)).collect::<Result<_, _>>()?)
    };

    let discovered_from =
        args.discovered_from.as_ref().map(|raw| common::resolve(ctx, state, raw)).transpose()?;

    let mut statuses: HashSet<TaskStatus> = HashSet::new();
    if let Some(status) = args.status {
        statuses.insert(status.into());
    }
    for status in &args.statuses {
        statuses.insert((*status).into());
    }

    let label_filter = args
        .label
        .as_ref()
        .map(|raw| Label::parse(raw))
        .transpose()
        .map_err(|e| TsqError::new(ErrorCode::ValidationError, e))?;
    let label_any: Vec<Label> = args
        .label_any
        .iter()
        .map(|raw| Label::parse(raw))
        .collect::<Result<_, String>>()
        .map_err(|e| TsqError::new(ErrorCode::ValidationError, e))?;

    let ids: Vec<TaskId> = state
        .created_order
        .iter()
        .filter(|id| {
            let Some(task) = state.get(id) else { return false };
            if let Some(set) = &explicit_ids {
                if !set.contains(*id) {
                    return false;
                }
            }
            if !statuses.is_empty() && !statuses.contains(&task.status) {
                return false;
            }
            if let Some(assignee) = &args.assignee {
                if task.assignee.as_deref() != Some(assignee.as_str()) {
                    return false;
                }
            }
            if args.unassigned && task.assignee.is_some() {
                return false;
            }
            if let Some(external_ref) = &args.external_ref {
                if task.external_ref.as_deref() != Some(external_ref.as_str()) {
                    return false;
                }
            }
            if let Some(from) = &discovered_from {
                if task.discovered_from.as_ref() != Some(from) {
                    return false;
                }
            }
            if let Some(kind) = args.kind {
                if task.kind != kind.into() {
                    return false;
                }
            }
            if let Some(label) = &label_filter {
                if !task.labels.contains(label) {
                    return false;
                }
            }
            if !label_any.is_empty() && !label_any.iter().any(|label| task.labels.contains(label)) {
                return false;
            }
            if let Some(planning_state) = args.planning_state {
                if task.planning_state != planning_state.into() {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect();

    if args.tree {
        let filtered: Vec<TaskId> = if args.full {
            ids
        } else {
            ids.into_iter().filter(|id| state.get(id).map(|task| !task.is_closed_like()).unwrap_or(false)).collect()
        };
        let forest = tsq_engine::build_tree(state, &filtered);
        return Ok(serde_json::json!({ "tree": tree_to_json(state, &forest)? }));
    }

    Ok(Value::Array(common::tasks_value_vec(state, &ids)?))
}

fn tree_to_json(state: &State, nodes: &[TreeNode]) -> Result<Vec<Value>, TsqError> {
    nodes
        .iter()
        .map(|node| {
            let mut value = common::task_value(state, &node.id)?;
            let children = tree_to_json(state, &node.children)?;
            if let Value::Object(map) = &mut value {
                map.insert("children".to_string(), Value::Array(children));
            }
            Ok(value)
        })
        .collect()
}

pub fn ready(ctx: &Ctx, args: &ReadyArgs) -> Result<Value, TsqError> {
    let loaded = common::load(ctx)?;
    let state = &loaded.state;

    let ids: Vec<TaskId> = tsq_engine::list_ready(state)
        .into_iter()
        .filter(|id| match args.lane {
            Some(lane) => state.get(id).map(|task| task.planning_state == lane.into()).unwrap_or(false),
            None => true,
        })
        .cloned()
        .collect();

    Ok(Value::Array(common::tasks_value_vec(state, &ids)?))
}

pub fn stale(ctx: &Ctx, args: &StaleArgs) -> Result<Value, TsqError> {
    if args.days < 0 {
        return Err(TsqError::new(ErrorCode::ValidationError, "days must be >= 0"));
    }

    let loaded = common::load(ctx)?;
    let state = &loaded.state;
    let now = ctx.now();
    let now_dt = chrono::DateTime::parse_from_rfc3339(&now)
        .map_err(|e| TsqError::new(ErrorCode::InternalError, format!("invalid clock reading: {e}")))?
        .with_timezone(&chrono::Utc);
    let cutoff = (now_dt - chrono::Duration::days(args.days)).to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    let statuses: Vec<TaskStatus> = if args.statuses.is_empty() {
        DEFAULT_STALE_STATUSES.to_vec()
    } else {
        args.statuses.iter().map(|status| (*status).into()).collect()
    };

    let mut ids: Vec<TaskId> = state
        .created_order
        .iter()
        .filter(|id| state.get(id).map(|task| statuses.contains(&task.status) && task.updated_at <= cutoff).unwrap_or(false))
        .cloned()
        .collect();
    ids.sort_by(|a, b| {
        let ts_a = state.get(a).map(|task| task.updated_at.as_str()).unwrap_or_default();
        let ts_b = state.get(b).map(|task| task.updated_at.as_str()).unwrap_or_default();
        ts_a.cmp(ts_b)
    });

    Ok(serde_json::json!({
        "tasks": common::tasks_value_vec(state, &ids)?,
        "days": args.days,
        "cutoff": cutoff,
        "statuses": statuses.iter().map(ToString::to_string).collect::<Vec<_>>(),
    }))
}

pub fn history(ctx: &Ctx, args: &HistoryArgs) -> Result<Value, TsqError> {
    let loaded = common::load(ctx)?;
    let id = common::resolve(ctx, &loaded.state, &args.id)?;

    let mut events: Vec<&EventRecord> = loaded.all_events.iter().filter(|event| event_relates_to(event, &id)).collect();
    if let Some(event_type) = &args.event_type {
        events.retain(|event| &event.event_type.to_string() == event_type);
    }
    if let Some(actor) = &args.actor {
        events.retain(|event| &event.actor == actor);
    }
    if let Some(since) = &args.since {
        events.retain(|event| &event.ts >= since);
    }
    events.sort_by(|a, b| b.ts.cmp(&a.ts));

    let truncated = events.len() > args.limit;
    events.truncate(args.limit);

    Ok(serde_json::json!({ "events": events, "count": events.len(), "truncated": truncated }))
}

/// An event is "related to" `id` if it's stamped on that task directly, or
/// if any string-typed payload value names it exactly — e.g. a
/// `task.duplicated` event on the source names the canonical task this way.
fn event_relates_to(event: &EventRecord, id: &TaskId) -> bool {
    if event.task_id.as_ref() == Some(id) {
        return true;
    }
    event.payload.values().any(|value| value.as_str() == Some(id.as_str()))
}

pub fn search(ctx: &Ctx, args: &SearchArgs) -> Result<Value, TsqError> {
    let loaded = common::load(ctx)?;
    let query = tsq_engine::parse_query(&args.query)?;
    let ids = tsq_engine::evaluate_query(&loaded.state, &query);
    Ok(Value::Array(common::tasks_value_vec(&loaded.state, &ids)?))
}

pub fn orphans(ctx: &Ctx) -> Result<Value, TsqError> {
    let loaded = common::load(ctx)?;
    let plan = tsq_engine::scan_repair(&loaded.state, &ctx.paths, ctx.host())?;

    let orphan_deps: Vec<Value> = plan
        .orphan_deps
        .iter()
        .map(|(task_id, blocker, dep_type)| {
            serde_json::json!({ "task_id": task_id, "blocker": blocker, "dep_type": dep_type.to_string() })
        })
        .collect();
    let orphan_links: Vec<Value> = plan
        .orphan_links
        .iter()
        .map(|(src, dst, kind)| serde_json::json!({ "src": src, "dst": dst, "kind": kind.to_string() }))
        .collect();

    Ok(serde_json::json!({
        "orphan_deps": orphan_deps,
        "orphan_links": orphan_links,
        "total": plan.orphan_deps.len() + plan.orphan_links.len(),
    }))
}

pub fn doctor(ctx: &Ctx) -> Result<Value, TsqError> {
    let loaded = common::load(ctx)?;
    let plan = tsq_engine::scan_repair(&loaded.state, &ctx.paths, ctx.host())?;

    Ok(serde_json::json!({
        "tasks": loaded.state.tasks.len(),
        "events": loaded.all_events.len(),
        "snapshot_loaded": loaded.snapshot_event_count.is_some(),
        "warning": loaded.warning,
        "issues": doctor_issues(&plan),
    }))
}

fn doctor_issues(plan: &RepairPlan) -> Vec<String> {
    let mut issues = Vec::new();
    for (task_id, blocker, dep_type) in &plan.orphan_deps {
        issues.push(format!("dependency edge references missing task: {task_id} -> {blocker} ({dep_type})"));
    }
    for (src, dst, kind) in &plan.orphan_links {
        issues.push(format!("relation link references missing task: {src} -[{kind}]-> {dst}"));
    }
    for path in &plan.stale_temp_files {
        issues.push(format!("stale temp file: {}", path.display()));
    }
    if let Some(lock) = &plan.stale_lock {
        issues.push(format!("stale lock held by pid {} on host {}", lock.pid, lock.host));
    }
    for path in &plan.old_snapshots {
        issues.push(format!("snapshot beyond retention: {}", path.display()));
    }
    issues
}
