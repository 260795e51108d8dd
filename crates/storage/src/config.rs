// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `.tasque/config.json` — the handful of settings that outlive a single
//! command invocation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Schema version this binary writes and expects to read. Bumped only when
/// the on-disk event/snapshot shape changes in a way that requires a
/// migration.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Default number of events between automatic snapshots.
const DEFAULT_SNAPSHOT_EVERY: u64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub schema_version: u32,
    #[serde(default = "default_snapshot_every")]
    pub snapshot_every: u64,
}

fn default_snapshot_every() -> u64 {
    DEFAULT_SNAPSHOT_EVERY
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { schema_version: CURRENT_SCHEMA_VERSION, snapshot_every: DEFAULT_SNAPSHOT_EVERY }
    }
}

impl StoreConfig {
    pub fn load(path: &Path) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(self)?;
        fs::write(path, bytes)
    }
}
