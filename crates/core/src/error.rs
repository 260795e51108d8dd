// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single error type crossing the command-layer boundary.
//!
//! Grounded on `oj::exit_error::ExitError`'s split between a typed failure
//! and process termination: [`TsqError`] carries a stable [`ErrorCode`] and
//! message, and the exit-code mapping is applied exactly once, at
//! the CLI binary's `main`, not scattered through the engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable error codes, each mapping to exit code 1 or 2.
///
/// `rename_all = "SCREAMING_SNAKE_CASE"` makes the wire form match the
/// `Display` impl below exactly (`"TASK_NOT_FOUND"`, not Rust's default
/// `"TaskNotFound"`) — the envelope's `"code"` field and the human-mode
/// `CODE: message` line need to agree on one spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    NotInitialized,
    TaskNotFound,
    TaskIdAmbiguous,
    NotFound,
    DependencyCycle,
    DuplicateCycle,
    ClaimConflict,
    InvalidStatus,
    SpecValidationFailed,
    LockHeld,
    IoError,
    InternalError,
}

crate::simple_display! {
    ErrorCode {
        ValidationError => "VALIDATION_ERROR",
        NotInitialized => "NOT_INITIALIZED",
        TaskNotFound => "TASK_NOT_FOUND",
        TaskIdAmbiguous => "TASK_ID_AMBIGUOUS",
        NotFound => "NOT_FOUND",
        DependencyCycle => "DEPENDENCY_CYCLE",
        DuplicateCycle => "DUPLICATE_CYCLE",
        ClaimConflict => "CLAIM_CONFLICT",
        InvalidStatus => "INVALID_STATUS",
        SpecValidationFailed => "SPEC_VALIDATION_FAILED",
        LockHeld => "LOCK_HELD",
        IoError => "IO_ERROR",
        InternalError => "INTERNAL_ERROR",
    }
}

impl ErrorCode {
    /// Process exit code this error kind maps to.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorCode::NotInitialized
            | ErrorCode::LockHeld
            | ErrorCode::IoError
            | ErrorCode::InternalError => 2,
            _ => 1,
        }
    }
}

/// A failure produced by a command, carrying a stable code, a human
/// message, and optional structured details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TsqError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl TsqError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), details: None }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn exit_code(&self) -> i32 {
        self.code.exit_code()
    }
}

impl fmt::Display for TsqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for TsqError {}

impl From<std::io::Error> for TsqError {
    fn from(err: std::io::Error) -> Self {
        TsqError::new(ErrorCode::IoError, err.to_string())
    }
}

impl From<serde_json::Error> for TsqError {
    fn from(err: serde_json::Error) -> Self {
        TsqError::new(ErrorCode::InternalError, format!("malformed JSON: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_exits_one() {
        assert_eq!(ErrorCode::ValidationError.exit_code(), 1);
        assert_eq!(ErrorCode::ClaimConflict.exit_code(), 1);
        assert_eq!(ErrorCode::DependencyCycle.exit_code(), 1);
    }

    #[test]
    fn io_and_lock_errors_exit_two() {
        assert_eq!(ErrorCode::IoError.exit_code(), 2);
        assert_eq!(ErrorCode::LockHeld.exit_code(), 2);
        assert_eq!(ErrorCode::NotInitialized.exit_code(), 2);
        assert_eq!(ErrorCode::InternalError.exit_code(), 2);
    }

    #[test]
    fn display_matches_wire_code() {
        let err = TsqError::new(ErrorCode::TaskNotFound, "no such task");
        assert_eq!(err.to_string(), "TASK_NOT_FOUND: no such task");
    }
}
