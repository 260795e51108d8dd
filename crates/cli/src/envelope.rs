// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The machine-mode response envelope: `{schema_version, command,
//! ok, data|error}`. Grounded on `oj::output`'s envelope struct, trimmed to
//! the single shape tasque's command layer needs — there is no streaming or
//! multi-frame response here, just one JSON object per invocation.

use serde::Serialize;
use serde_json::Value;
use tsq_core::error::TsqError;

/// Bumped only when the on-disk or wire formats change.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct Envelope {
    pub schema_version: u32,
    pub command: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<TsqError>,
}

impl Envelope {
    pub fn ok(command: impl Into<String>, data: Value) -> Self {
        Self { schema_version: SCHEMA_VERSION, command: command.into(), ok: true, data: Some(data), error: None }
    }

    pub fn err(command: impl Into<String>, error: TsqError) -> Self {
        Self { schema_version: SCHEMA_VERSION, command: command.into(), ok: false, data: None, error: Some(error) }
    }
}
