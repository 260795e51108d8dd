// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Assembles a [`State`] for a command to operate on: the newest usable
//! snapshot, tailed by whatever the log has recorded since.
//!
//! Grounded on `oj-storage`'s snapshot-then-tail bootstrap, generalized here
//! to walk the snapshot list newest-first until one actually parses and
//! isn't ahead of the log, rather than trusting the single newest file.

use crate::projector::apply_replay;
use std::path::Path;
use tsq_core::event::EventRecord;
use tsq_core::id::EventId;
use tsq_core::state::State;
use tsq_storage::{Snapshot, StoreError, StorePaths, Wal};

/// Result of [`load_projected_state`]: the replayed state, the full event
/// history (for queries that need it), and any warnings accumulated along
/// the way.
pub struct LoadedState {
    pub state: State,
    pub all_events: Vec<EventRecord>,
    pub warning: Option<String>,
    pub snapshot_event_count: Option<EventId>,
}

/// Load the newest valid snapshot whose `event_count` does not exceed the
/// log's length, then replay the remaining tail on top of it. Falls back to
/// progressively older snapshots, and finally to a full replay from the
/// empty state, if a candidate is corrupt or ahead of the log.
pub fn load_projected_state(paths: &StorePaths) -> Result<LoadedState, StoreError> {
    let wal = Wal::open(&paths.events_path()).map_err(StoreError::Wal)?;
    let all_events = wal.read_all().map_err(StoreError::Wal)?;
    let log_len = all_events.len() as u64;

    let mut warnings: Vec<String> = Vec::new();
    let mut base: Option<(State, EventId)> = None;

    let snapshot_paths =
        tsq_storage::snapshot::list_snapshots(&paths.snapshots_dir()).map_err(StoreError::Snapshot)?;
    for snap_path in &snapshot_paths {
        match load_candidate(snap_path, log_len) {
            Ok(Some((state, count))) => {
                base = Some((state, count));
                break;
            }
            Ok(None) => continue,
            Err(message) => {
                warnings.push(message);
                continue;
            }
        }
    }

    let (mut state, start_count) = base.unwrap_or_else(|| (State::new(), EventId(0)));

    for record in all_events.iter().filter(|r| r.event_id > start_count) {
        if let Some(warning) = apply_replay(&mut state, record) {
            warnings.push(warning);
        }
    }

    let warning = (!warnings.is_empty()).then(|| warnings.join("; "));
    Ok(LoadedState {
        state,
        all_events,
        warning,
        snapshot_event_count: (start_count.0 > 0).then_some(start_count),
    })
}

/// Try one snapshot candidate. `Ok(None)` means skip silently (missing
/// file); `Err` carries a warning to surface and also means skip.
fn load_candidate(path: &Path, log_len: u64) -> Result<Option<(State, EventId)>, String> {
    match Snapshot::load(path) {
        Ok(Some(snapshot)) => {
            if snapshot.event_count.0 > log_len {
                Err(format!(
                    "snapshot {} claims {} events but log has {log_len}, skipping",
                    path.display(),
                    snapshot.event_count.0
                ))
            } else {
                Ok(Some((snapshot.state, snapshot.event_count)))
            }
        }
        Ok(None) => Ok(None),
        Err(e) => Err(format!("failed to load snapshot {}: {e}", path.display())),
    }
}

#[cfg(test)]
#[path = "load_tests.rs"]
mod tests;
