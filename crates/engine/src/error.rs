// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validation failures produced while building new events (as opposed to
//! replaying ones already on disk — see [`crate::projector`] for that).

use thiserror::Error;
use tsq_core::error::{ErrorCode, TsqError};
use tsq_core::id::TaskId;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("task {0} not found")]
    TaskNotFound(TaskId),
    #[error("{count} tasks match prefix {prefix:?}: {candidates:?}")]
    TaskIdAmbiguous { prefix: String, candidates: Vec<TaskId>, count: usize },
    #[error("self-referential edge on {0}")]
    SelfEdge(TaskId),
    #[error("adding this dependency would create a cycle")]
    DependencyCycle,
    #[error("marking this duplicate would create a cycle")]
    DuplicateCycle,
    #[error("task {0} is already claimed by {1}")]
    ClaimConflict(TaskId, String),
    #[error("task {0} is not in a state that allows this transition")]
    InvalidStatus(TaskId),
    #[error("task {0} has no spec attached; claim with --require-spec needs one first")]
    SpecRequired(TaskId),
    #[error("{0}")]
    Generic(String),
}

impl From<ValidationError> for TsqError {
    fn from(err: ValidationError) -> Self {
        match &err {
            ValidationError::TaskNotFound(id) => {
                TsqError::new(ErrorCode::TaskNotFound, format!("no task matches {id}"))
            }
            ValidationError::TaskIdAmbiguous { prefix, candidates, .. } => TsqError::new(
                ErrorCode::TaskIdAmbiguous,
                format!("{} tasks match prefix {prefix:?}", candidates.len()),
            )
            .with_details(serde_json::json!({ "candidates": candidates })),
            ValidationError::SelfEdge(_) => TsqError::new(ErrorCode::ValidationError, err.to_string()),
            ValidationError::DependencyCycle => TsqError::new(ErrorCode::DependencyCycle, err.to_string()),
            ValidationError::DuplicateCycle => TsqError::new(ErrorCode::DuplicateCycle, err.to_string()),
            ValidationError::ClaimConflict(..) => TsqError::new(ErrorCode::ClaimConflict, err.to_string()),
            ValidationError::InvalidStatus(_) => TsqError::new(ErrorCode::InvalidStatus, err.to_string()),
            ValidationError::SpecRequired(_) => TsqError::new(ErrorCode::SpecValidationFailed, err.to_string()),
            ValidationError::Generic(_) => TsqError::new(ErrorCode::ValidationError, err.to_string()),
        }
    }
}
