// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store discovery, actor/clock resolution, and the mutating command
//! pipeline: `lock → loadProjection → validate → buildEvents →
//! appendEvents → applyToState → maybeSnapshot → unlock → respond`.

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tsq_core::clock::{Clock, SystemClock};
use tsq_core::error::{ErrorCode, TsqError};
use tsq_core::event::EventRecord;
use tsq_core::id::TaskId;
use tsq_core::state::State;
use tsq_engine::{LoadedState, ValidationError};
use tsq_storage::{StoreConfig, StoreError, StoreLock, StorePaths, Wal};

/// Serialize a typed event payload into the generic JSON map `EventRecord`
/// carries on the wire.
pub fn to_payload<T: Serialize>(value: &T) -> Map<String, Value> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Resolved invocation context shared by every command after store
/// discovery. Built once in `main` and threaded through by reference.
pub struct Ctx {
    pub paths: StorePaths,
    pub actor: String,
    pub exact_id: bool,
    host: String,
    clock: SystemClock,
}

impl Ctx {
    pub fn discover(repo: Option<PathBuf>, actor: Option<String>, exact_id: bool) -> Result<Self, TsqError> {
        let start = repo.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
        let paths = StorePaths::discover(&start).ok_or_else(|| {
            TsqError::new(ErrorCode::NotInitialized, format!("no .tasque store found above {}", start.display()))
        })?;
        Ok(Self { paths, actor: resolve_actor(actor), exact_id, host: local_hostname(), clock: SystemClock::new() })
    }

    pub fn now(&self) -> String {
        self.clock.now_rfc3339_ms()
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

fn resolve_actor(explicit: Option<String>) -> String {
    explicit
        .or_else(|| std::env::var("TSQ_ACTOR").ok())
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "unknown".to_string())
}

fn local_hostname() -> String {
    std::env::var("HOSTNAME").or_else(|_| std::env::var("COMPUTERNAME")).unwrap_or_else(|_| "localhost".to_string())
}

/// Load the projected state without acquiring the lock — read-only
/// commands skip the lock and event append.
pub fn load(ctx: &Ctx) -> Result<LoadedState, TsqError> {
    let loaded = tsq_engine::load_projected_state(&ctx.paths)?;
    if let Some(warning) = &loaded.warning {
        tracing::warn!(%warning, "projection warnings while loading store");
    }
    Ok(loaded)
}

/// Resolve a user-supplied id or id prefix against a loaded `State`.
pub fn resolve(ctx: &Ctx, state: &State, raw: &str) -> Result<TaskId, TsqError> {
    tsq_engine::resolve_id(state, raw, ctx.exact_id).map_err(TsqError::from)
}

/// Run the full mutating pipeline. `build` receives the freshly-loaded
/// state, the resolved actor, and `now`, and returns the event(s) to append
/// (with a placeholder `event_id` — [`Wal::append_batch`] assigns the real
/// ones). Events are validated against a trial clone of `state` before
/// anything touches disk, so a rejected command never partially appends.
pub fn mutate(
    ctx: &Ctx,
    build: impl FnOnce(&State, &str, &str) -> Result<Vec<EventRecord>, ValidationError>,
) -> Result<(State, Vec<EventRecord>), TsqError> {
    let lock = StoreLock::acquire(&ctx.paths.lock_path(), &ctx.host, &ctx.now()).map_err(StoreError::Lock)?;
    tracing::info!(host = %ctx.host, "store lock acquired");

    let loaded = load(ctx)?;
    let mut state = loaded.state;
    let now = ctx.now();
    let built = build(&state, &ctx.actor, &now)?;

    let mut trial = state.clone();
    for event in &built {
        tsq_engine::apply_live(&mut trial, event)?;
    }

    let mut wal = Wal::open(&ctx.paths.events_path()).map_err(StoreError::Wal)?;
    let config = StoreConfig::load(&ctx.paths.config_path()).map_err(StoreError::Io)?;
    let appended = wal.append_batch(built).map_err(StoreError::Wal)?;
    for event in &appended {
        if tsq_engine::apply_live(&mut state, event).is_ok() {
            state.bump_applied();
        }
    }

    maybe_snapshot(ctx, &state, &config)?;

    lock.release().map_err(StoreError::Lock)?;
    tracing::info!("store lock released");
    Ok((state, appended))
}

/// Render a single task as its wire JSON shape.
pub fn task_value(state: &State, id: &TaskId) -> Result<Value, TsqError> {
    let task = state
        .get(id)
        .ok_or_else(|| TsqError::new(ErrorCode::InternalError, format!("task {id} missing after mutation")))?;
    Ok(serde_json::to_value(task)?)
}

/// Render a list of tasks as their wire JSON shape, in the given order.
pub fn tasks_value_vec(state: &State, ids: &[TaskId]) -> Result<Vec<Value>, TsqError> {
    ids.iter().map(|id| task_value(state, id)).collect()
}

fn maybe_snapshot(ctx: &Ctx, state: &State, config: &StoreConfig) -> Result<(), TsqError> {
    if config.snapshot_every == 0 || state.applied_events == 0 || state.applied_events % config.snapshot_every != 0 {
        return Ok(());
    }
    let taken_at = chrono::Utc::now();
    let event_count = tsq_core::id::EventId(state.applied_events);
    let snapshot = tsq_storage::Snapshot::new(taken_at, event_count, state.clone());
    let path = tsq_storage::snapshot::snapshot_path(&ctx.paths.snapshots_dir(), taken_at, event_count);
    snapshot.save(&path).map_err(StoreError::Snapshot)?;
    tracing::debug!(path = %path.display(), "wrote snapshot");
    tsq_storage::snapshot::gc_snapshots(&ctx.paths.snapshots_dir()).map_err(StoreError::Snapshot)?;
    Ok(())
}
