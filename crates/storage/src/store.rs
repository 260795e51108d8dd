// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `.tasque/` directory layout and store initialization.

use crate::config::StoreConfig;
use crate::error::StoreError;
use std::path::{Path, PathBuf};

const GITIGNORE_CONTENTS: &str = "snapshots/\nstate.json\n.lock\n";

/// Resolved paths under a project's `.tasque/` directory.
#[derive(Debug, Clone)]
pub struct StorePaths {
    pub root: PathBuf,
}

impl StorePaths {
    /// `root` is the repo-relative `.tasque` directory itself, not its
    /// parent.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Locate `.tasque` by walking up from `start`, the way git locates
    /// `.git`. Returns `None` if no ancestor has one.
    pub fn discover(start: &Path) -> Option<Self> {
        let mut dir = start.to_path_buf();
        loop {
            let candidate = dir.join(".tasque");
            if candidate.is_dir() {
                return Some(Self::new(candidate));
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub fn events_path(&self) -> PathBuf {
        self.root.join("events.jsonl")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join(".lock")
    }

    pub fn snapshots_dir(&self) -> PathBuf {
        self.root.join("snapshots")
    }

    pub fn state_cache_path(&self) -> PathBuf {
        self.root.join("state.json")
    }

    pub fn specs_dir(&self) -> PathBuf {
        self.root.join("specs")
    }

    pub fn spec_path(&self, task_id: &str) -> PathBuf {
        self.specs_dir().join(task_id).join("spec.md")
    }
}

/// Create a fresh `.tasque/` store at `root` (the directory named `.tasque`
/// itself). Fails if a config file already exists there.
pub fn init_store(root: &Path) -> Result<StorePaths, StoreError> {
    let paths = StorePaths::new(root);
    if paths.config_path().exists() {
        return Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} already initialized", root.display()),
        )));
    }

    std::fs::create_dir_all(&paths.root)?;
    std::fs::create_dir_all(paths.snapshots_dir())?;
    std::fs::create_dir_all(paths.specs_dir())?;
    std::fs::write(paths.root.join(".gitignore"), GITIGNORE_CONTENTS)?;
    StoreConfig::default().save(&paths.config_path())?;
    std::fs::write(paths.events_path(), b"")?;

    Ok(paths)
}

/// True if `root` already contains an initialized store.
pub fn is_initialized(root: &Path) -> bool {
    StorePaths::new(root).config_path().exists()
}
