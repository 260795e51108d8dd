// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic serialized snapshots of the projected [`State`], so a command
//! doesn't have to replay the entire event log from scratch every time.
//!
//! Grounded on `oj-storage::snapshot::Snapshot`: atomic tmp-file-then-rename
//! writes, and corrupt snapshots are rotated to `.bak` rather than deleted.
//! Tasque runs every command synchronously in the CLI process, so there is
//! no background-thread compression pipeline here — `save` just writes and
//! fsyncs inline.

use crate::error::SnapshotError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::warn;
use tsq_core::id::EventId;
use tsq_core::state::State;

/// The complete materialized state at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub taken_at: DateTime<Utc>,
    pub event_count: EventId,
    pub state: State,
}

impl Snapshot {
    pub fn new(taken_at: DateTime<Utc>, event_count: EventId, state: State) -> Self {
        Self { taken_at, event_count, state }
    }

    /// Write the snapshot atomically: serialize to a sibling `.tmp` file,
    /// fsync it, then rename over `path`.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, self)?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Load the snapshot at `path`. A missing file is `Ok(None)`; a corrupt
    /// one is rotated to `.bak` and also reported as `Ok(None)` so the
    /// caller falls back to a full log replay.
    pub fn load(path: &Path) -> Result<Option<Self>, SnapshotError> {
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        match serde_json::from_reader(reader) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                let bak_path = rotate_bak_path(path);
                warn!(
                    error = %e,
                    path = %path.display(),
                    bak = %bak_path.display(),
                    "corrupt snapshot, moving to .bak and falling back to log replay",
                );
                fs::rename(path, &bak_path)?;
                Ok(None)
            }
        }
    }
}

const MAX_BAK_FILES: u32 = 3;

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out. Keeps
/// up to [`MAX_BAK_FILES`] backups; the oldest is dropped once at capacity.
pub(crate) fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }
    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }
    bak(1)
}

/// Number of snapshot files the garbage collector keeps.
const KEEP_SNAPSHOTS: usize = 5;

/// List snapshot files under `dir`, newest first, based on the
/// `<iso>-<event_count>.json` naming convention.
pub fn list_snapshots(dir: &Path) -> Result<Vec<PathBuf>, SnapshotError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut entries: Vec<(u64, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else { continue };
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else { continue };
        if ext != "json" {
            continue;
        }
        let Some((_, count_str)) = stem.rsplit_once('-') else { continue };
        if let Ok(count) = count_str.parse::<u64>() {
            entries.push((count, path));
        }
    }
    entries.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(entries.into_iter().map(|(_, p)| p).collect())
}

/// Remove all but the most recent [`KEEP_SNAPSHOTS`] snapshot files.
pub fn gc_snapshots(dir: &Path) -> Result<usize, SnapshotError> {
    let snapshots = list_snapshots(dir)?;
    let mut removed = 0;
    for path in snapshots.into_iter().skip(KEEP_SNAPSHOTS) {
        fs::remove_file(&path)?;
        removed += 1;
    }
    Ok(removed)
}

/// Build the path a snapshot taken at `taken_at`/`event_count` should live
/// at. The timestamp component is colon-free (`%Y%m%dT%H%M%S%.3fZ`) so the
/// filename stays portable across filesystems that reject `:`.
pub fn snapshot_path(dir: &Path, taken_at: DateTime<Utc>, event_count: EventId) -> PathBuf {
    dir.join(format!("{}-{}.json", taken_at.format("%Y%m%dT%H%M%S%.3fZ"), event_count.0))
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
