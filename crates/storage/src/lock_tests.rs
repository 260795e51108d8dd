// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn acquire_writes_host_pid_and_timestamp() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".lock");
    let lock = StoreLock::acquire(&path, "myhost", "2024-01-01T00:00:00.000Z").unwrap();

    let info = read_lock_file(&path).unwrap().unwrap();
    assert_eq!(info.host, "myhost");
    assert_eq!(info.pid, std::process::id());
    assert_eq!(info.created_at, "2024-01-01T00:00:00.000Z");

    lock.release().unwrap();
    assert!(!path.exists());
}

#[test]
fn second_acquire_in_same_process_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".lock");
    let _held = StoreLock::acquire(&path, "myhost", "t").unwrap();

    let second = StoreLock::acquire(&path, "myhost", "t2");
    assert!(matches!(second, Err(LockError::Held { .. })));
}

#[test]
fn is_stale_detects_dead_local_pid() {
    let info = LockInfo { host: "myhost".into(), pid: 999_999, created_at: "t".into() };
    assert!(is_stale(&info, "myhost"));
}

#[test]
fn is_stale_is_false_for_live_pid() {
    let info = LockInfo { host: "myhost".into(), pid: std::process::id(), created_at: "t".into() };
    assert!(!is_stale(&info, "myhost"));
}

#[test]
fn is_stale_never_claims_a_different_host_is_stale() {
    let info = LockInfo { host: "otherhost".into(), pid: 999_999, created_at: "t".into() };
    assert!(!is_stale(&info, "myhost"));
}

#[test]
fn force_remove_clears_lock_file_unconditionally() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".lock");
    std::fs::write(&path, "stale").unwrap();
    force_remove(&path).unwrap();
    assert!(!path.exists());
}
