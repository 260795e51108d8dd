// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the storage layer.

use std::io;
use thiserror::Error;
use tsq_core::{ErrorCode, TsqError};

#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum LockError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store is locked by pid {pid} on {host} since {created_at}")]
    Held { host: String, pid: u32, created_at: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(".tasque directory not found at {0}")]
    NotInitialized(String),
    #[error(transparent)]
    Wal(#[from] WalError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<StoreError> for TsqError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotInitialized(path) => {
                TsqError::new(ErrorCode::NotInitialized, format!("no store at {path}; run `tsq init`"))
            }
            StoreError::Lock(LockError::Held { host, pid, created_at }) => TsqError::new(
                ErrorCode::LockHeld,
                format!("store locked by pid {pid} on {host} since {created_at}"),
            ),
            other => TsqError::new(ErrorCode::IoError, other.to_string()),
        }
    }
}
