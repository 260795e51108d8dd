// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repair plan generation and application.
//!
//! Grounded on `tsq_storage::lock::is_stale` for local pid-liveness and the
//! storage crate's snapshot GC for the "beyond the 5 most recent" rule; the
//! orphan scans are plain linear passes over `State`, since a store's graph
//! is small enough that no index is worth building for a read-only report.

use std::path::PathBuf;
use tsq_core::dep::DepType;
use tsq_core::event::{EventRecord, EventType, RepairItem};
use tsq_core::id::{EventId, TaskId};
use tsq_core::link::RelationKind;
use tsq_core::state::State;
use tsq_storage::{LockInfo, StoreError, StorePaths, Wal};

/// Everything a `repair` scan found, dry-run or not.
#[derive(Debug, Clone, Default)]
pub struct RepairPlan {
    pub orphan_deps: Vec<(TaskId, TaskId, DepType)>,
    pub orphan_links: Vec<(TaskId, TaskId, RelationKind)>,
    pub stale_temp_files: Vec<PathBuf>,
    pub stale_lock: Option<LockInfo>,
    pub old_snapshots: Vec<PathBuf>,
}

impl RepairPlan {
    pub fn is_empty(&self) -> bool {
        self.orphan_deps.is_empty()
            && self.orphan_links.is_empty()
            && self.stale_temp_files.is_empty()
            && self.stale_lock.is_none()
            && self.old_snapshots.is_empty()
    }
}

/// Scan a projected `State` and its store directory for repairable issues.
/// Read-only: never mutates anything on disk or in `state`.
pub fn scan(state: &State, paths: &StorePaths, local_host: &str) -> Result<RepairPlan, StoreError> {
    let mut plan = RepairPlan::default();

    for (task_id, edges) in &state.deps {
        for edge in edges {
            if !state.contains(&edge.from) || !state.contains(&edge.to) {
                plan.orphan_deps.push((task_id.clone(), edge.to.clone(), edge.dep_type));
            }
        }
    }

    for (task_id, by_kind) in &state.links {
        for (kind, targets) in by_kind {
            for target in targets {
                if !state.contains(task_id) || !state.contains(target) {
                    plan.orphan_links.push((task_id.clone(), target.clone(), *kind));
                }
            }
        }
    }

    if paths.root.is_dir() {
        for entry in std::fs::read_dir(&paths.root).map_err(StoreError::Io)? {
            let entry = entry.map_err(StoreError::Io)?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.contains("tmp-") {
                plan.stale_temp_files.push(entry.path());
            }
        }
    }

    if let Some(info) = tsq_storage::lock::read_lock_file(&paths.lock_path()).map_err(StoreError::Lock)? {
        if tsq_storage::lock::is_stale(&info, local_host) {
            plan.stale_lock = Some(info);
        }
    }

    let snapshots = tsq_storage::snapshot::list_snapshots(&paths.snapshots_dir()).map_err(StoreError::Snapshot)?;
    plan.old_snapshots = snapshots.into_iter().skip(5).collect();

    Ok(plan)
}

/// Apply a previously scanned plan. Orphan dep/link removals are folded
/// into `state` and recorded as a single `repair.applied` event (so the
/// removal survives the next replay); the remaining items are plain
/// filesystem cleanup with no event counterpart. `force_unlock` gates
/// whether a stale lock is actually removed.
pub fn apply(
    state: &mut State,
    plan: &RepairPlan,
    paths: &StorePaths,
    wal: &mut Wal,
    actor: &str,
    now_ts: &str,
    force_unlock: bool,
) -> Result<Option<EventRecord>, StoreError> {
    let mut items = Vec::new();
    for (task_id, blocker, dep_type) in &plan.orphan_deps {
        items.push(RepairItem::OrphanDep {
            task_id: task_id.clone(),
            blocker: blocker.clone(),
            dep_type: *dep_type,
        });
    }
    for (task_id, to, kind) in &plan.orphan_links {
        items.push(RepairItem::OrphanLink { task_id: task_id.clone(), to: to.clone(), kind: *kind });
    }

    let applied_event = if items.is_empty() {
        None
    } else {
        let payload = serde_json::to_value(tsq_core::event::RepairAppliedPayload { items })
            .map_err(StoreError::Json)?
            .as_object()
            .cloned()
            .unwrap_or_default();
        let record = EventRecord::new(EventId(0), now_ts, actor, EventType::RepairApplied, None, payload);
        let record = wal.append(record).map_err(StoreError::Wal)?;
        crate::projector::apply_live(state, &record).ok();
        Some(record)
    };

    for path in &plan.stale_temp_files {
        let _ = std::fs::remove_file(path);
    }

    if force_unlock && plan.stale_lock.is_some() {
        tsq_storage::lock::force_remove(&paths.lock_path()).map_err(StoreError::Lock)?;
    }

    for path in &plan.old_snapshots {
        let _ = std::fs::remove_file(path);
    }

    Ok(applied_event)
}

#[cfg(test)]
#[path = "repair_tests.rs"]
mod tests;
