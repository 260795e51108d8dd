// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advisory single-host lock over a `.tasque` store.
//!
//! Grounded on the daemon startup lock in `oj-daemon::lifecycle`, which
//! takes an OS-level `flock` via `fs2` before writing its pid into the lock
//! file. Tasque has no long-running daemon to hold the fd open between
//! commands, so a plain `flock` isn't enough on its own: a crashed `tsq`
//! process releases its `flock` immediately, so the lock file itself needs
//! to carry `{host, pid, created_at}` so `tsq repair` can
//! recognize and clear a stale lock left by a process that died holding it
//! (e.g. on a shared filesystem where locking semantics differ host to
//! host). `fs2::try_lock_exclusive` is the actual exclusion mechanism for
//! same-host races between concurrent `tsq` invocations; the JSON sidecar
//! and the `nix`-based pid-liveness check in [`is_stale`] exist purely for
//! introspection and for `repair --force-unlock`'s safety check.

use crate::error::LockError;
use nix::sys::signal::kill;
use nix::unistd::Pid;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    pub host: String,
    pub pid: u32,
    pub created_at: String,
}

/// A held lock; dropping it releases the OS-level flock and removes the
/// lock file.
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Acquire the lock at `path`, failing with [`LockError::Held`] if
    /// another live process holds it.
    pub fn acquire(path: &Path, host: &str, now: &str) -> Result<Self, LockError> {
        use fs2::FileExt;

        let mut file = OpenOptions::new().read(true).write(true).create(true).open(path)?;

        if file.try_lock_exclusive().is_err() {
            let info = read_info(&mut file)?;
            return Err(match info {
                Some(info) => LockError::Held { host: info.host, pid: info.pid, created_at: info.created_at },
                None => LockError::Held {
                    host: host.to_string(),
                    pid: 0,
                    created_at: now.to_string(),
                },
            });
        }

        let info = LockInfo { host: host.to_string(), pid: std::process::id(), created_at: now.to_string() };
        write_info(&mut file, &info)?;

        Ok(Self { file, path: path.to_owned() })
    }

    pub fn release(self) -> Result<(), LockError> {
        use fs2::FileExt;
        self.file.unlock()?;
        let _ = std::fs::remove_file(&self.path);
        Ok(())
    }
}

/// Best-effort cleanup if a command bails out early via `?` before calling
/// `release` explicitly: without this, a validation failure after
/// `acquire()` would leave the sidecar file on disk (harmless to a future
/// `try_lock_exclusive`, but confusing to `repair`'s stale-lock scan, which
/// would see this process's own now-stale pid until something overwrites
/// or removes the file).
impl Drop for StoreLock {
    fn drop(&mut self) {
        use fs2::FileExt;
        let _ = self.file.unlock();
        let _ = std::fs::remove_file(&self.path);
    }
}

fn read_info(file: &mut File) -> Result<Option<LockInfo>, LockError> {
    file.seek(SeekFrom::Start(0))?;
    let mut buf = String::new();
    file.read_to_string(&mut buf)?;
    if buf.trim().is_empty() {
        return Ok(None);
    }
    Ok(serde_json::from_str(&buf).ok())
}

fn write_info(file: &mut File, info: &LockInfo) -> Result<(), LockError> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    serde_json::to_writer(&mut *file, info)?;
    file.sync_all()?;
    Ok(())
}

/// Read the lock file's metadata without attempting to acquire the lock
/// (used by `repair` to report/validate a held lock).
pub fn read_lock_file(path: &Path) -> Result<Option<LockInfo>, LockError> {
    if !path.exists() {
        return Ok(None);
    }
    let mut file = File::open(path)?;
    read_info(&mut file)
}

/// True if `info` names a pid that is no longer alive on this host.
///
/// Lock files naming a different host are never considered stale here —
/// liveness can only be checked locally; cross-host staleness is left to
/// `repair --force-unlock`'s explicit operator override.
pub fn is_stale(info: &LockInfo, local_host: &str) -> bool {
    if info.host != local_host {
        return false;
    }
    match kill(Pid::from_raw(info.pid as i32), None) {
        Ok(()) => false,
        Err(nix::errno::Errno::ESRCH) => true,
        Err(_) => false,
    }
}

/// Force-remove a lock file, bypassing the liveness check. Only called from
/// `repair --fix --force-unlock` after the caller has already confirmed
/// staleness (or been told to trust the operator).
pub fn force_remove(path: &Path) -> Result<(), LockError> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
