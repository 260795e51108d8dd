// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store lifecycle and self-repair: `init` bootstraps a fresh
//! `.tasque/`, `repair` previews or applies the same plan `doctor`/`orphans`
//! report on.

use super::common::Ctx;
use serde_json::Value;
use std::path::PathBuf;
use tsq_core::error::{ErrorCode, TsqError};
use tsq_engine::RepairPlan;

use crate::cli::RepairArgs;

pub fn init(repo: Option<PathBuf>) -> Result<Value, TsqError> {
    let start = repo.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    let root = start.join(".tasque");
    let paths = tsq_storage::init_store(&root)?;
    Ok(serde_json::json!({ "path": paths.root.display().to_string() }))
}

/// `repair` does not route through [`super::common::mutate`]: its apply
/// step also removes stale temp files, the lock sidecar, and old snapshots
/// as plain filesystem side effects the generic build-events closure has
/// no way to express, so the lock/load/apply/unlock sequence is spelled out
/// here instead.
pub fn repair(ctx: &Ctx, args: &RepairArgs) -> Result<Value, TsqError> {
    if args.force_unlock && !args.fix {
        return Err(TsqError::new(ErrorCode::ValidationError, "--force-unlock requires --fix"));
    }

    // Scan before acquiring the lock: `StoreLock::acquire` immediately
    // overwrites the `.lock` sidecar with this process's own (live) pid, so
    // a stale-lock scan run *after* acquiring would never see the previous
    // holder's info and could never report or remove it.
    let loaded = super::common::load(ctx)?;
    let plan = tsq_engine::scan_repair(&loaded.state, &ctx.paths, ctx.host())?;

    if !args.fix {
        return Ok(repair_plan_value(&plan, false));
    }

    let lock = tsq_storage::StoreLock::acquire(&ctx.paths.lock_path(), ctx.host(), &ctx.now())
        .map_err(tsq_storage::StoreError::Lock)?;

    let mut state = loaded.state;
    let mut wal = tsq_storage::Wal::open(&ctx.paths.events_path()).map_err(tsq_storage::StoreError::Wal)?;
    let now = ctx.now();
    tsq_engine::apply_repair(&mut state, &plan, &ctx.paths, &mut wal, &ctx.actor, &now, args.force_unlock)
        .map_err(TsqError::from)?;

    lock.release().map_err(tsq_storage::StoreError::Lock)?;

    Ok(repair_plan_value(&plan, true))
}

fn repair_plan_value(plan: &RepairPlan, fixed: bool) -> Value {
    serde_json::json!({
        "fixed": fixed,
        "orphan_deps": plan.orphan_deps.iter().map(|(task_id, blocker, dep_type)| {
            serde_json::json!({ "task_id": task_id, "blocker": blocker, "dep_type": dep_type.to_string() })
        }).collect::<Vec<_>>(),
        "orphan_links": plan.orphan_links.iter().map(|(src, dst, kind)| {
            serde_json::json!({ "src": src, "dst": dst, "kind": kind.to_string() })
        }).collect::<Vec<_>>(),
        "stale_temp_files": plan.stale_temp_files.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        "stale_lock": plan.stale_lock.as_ref().map(|lock| serde_json::json!({
            "host": lock.host,
            "pid": lock.pid,
            "created_at": lock.created_at,
        })),
        "old_snapshots": plan.old_snapshots.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
    })
}
