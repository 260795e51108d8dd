// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notes and spec attachment: freeform commentary and the
//! spec-fingerprint gate that `spec check` later re-verifies.

use super::common::{self, Ctx};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::Path;
use tsq_core::error::{ErrorCode, TsqError};
use tsq_core::event::{EventRecord, EventType, NoteAddedPayload, SpecAttachedPayload};
use tsq_core::id::EventId;

use crate::cli::{NoteCommand, SpecCommand};

/// Required top-level spec sections for `schema_version = 1`.
const REQUIRED_SECTIONS: [&str; 6] = [
    "Overview",
    "Constraints / Non-goals",
    "Interfaces (CLI/API)",
    "Data model / schema changes",
    "Acceptance criteria",
    "Test plan",
];

pub fn note(ctx: &Ctx, cmd: &NoteCommand) -> Result<Value, TsqError> {
    let NoteCommand::Add { id: raw_id, text } = cmd;

    let (state, _events) = common::mutate(ctx, move |state, actor, now| {
        let id = tsq_engine::resolve_id(state, raw_id, ctx.exact_id)?;
        let payload = NoteAddedPayload { text: text.clone() };
        Ok(vec![EventRecord::new(EventId(0), now, actor, EventType::NoteAdded, Some(id), common::to_payload(&payload))])
    })?;

    let id = common::resolve(ctx, &state, raw_id)?;
    common::task_value(&state, &id)
}

pub fn spec(ctx: &Ctx, cmd: &SpecCommand) -> Result<Value, TsqError> {
    match cmd {
        SpecCommand::Attach { id, file } => attach(ctx, id, file),
        SpecCommand::Check { id } => check(ctx, id),
    }
}

fn attach(ctx: &Ctx, raw_id: &str, file: &Path) -> Result<Value, TsqError> {
    let preview = common::load(ctx)?;
    let id = common::resolve(ctx, &preview.state, raw_id)?;

    let bytes = std::fs::read(file)?;
    let fingerprint = fingerprint_hex(&bytes);
    write_spec_file(&ctx.paths.spec_path(id.as_str()), &bytes)?;

    let (state, _events) = common::mutate(ctx, move |state, actor, now| {
        let id = tsq_engine::resolve_id(state, raw_id, ctx.exact_id)?;
        let payload = SpecAttachedPayload {
            spec_path: format!("specs/{id}/spec.md"),
            spec_fingerprint: fingerprint.clone(),
            spec_attached_by: actor.to_string(),
        };
        Ok(vec![EventRecord::new(EventId(0), now, actor, EventType::SpecAttached, Some(id), common::to_payload(&payload))])
    })?;

    let id = common::resolve(ctx, &state, raw_id)?;
    common::task_value(&state, &id)
}

fn check(ctx: &Ctx, raw_id: &str) -> Result<Value, TsqError> {
    let loaded = common::load(ctx)?;
    let id = common::resolve(ctx, &loaded.state, raw_id)?;
    let task = loaded
        .state
        .get(&id)
        .ok_or_else(|| TsqError::new(ErrorCode::InternalError, format!("task {id} missing after load")))?;

    let (Some(spec_path), Some(expected_fingerprint)) = (&task.spec_path, &task.spec_fingerprint) else {
        return Err(TsqError::new(ErrorCode::SpecValidationFailed, format!("task {id} has no spec attached")));
    };

    let file_path = ctx.paths.root.join(spec_path);
    let bytes = std::fs::read(&file_path)
        .map_err(|e| TsqError::new(ErrorCode::SpecValidationFailed, format!("failed to read {}: {e}", file_path.display())))?;

    let actual_fingerprint = fingerprint_hex(&bytes);
    let fingerprint_matches = &actual_fingerprint == expected_fingerprint;

    let text = String::from_utf8_lossy(&bytes);
    let missing_sections: Vec<&str> = REQUIRED_SECTIONS.iter().filter(|section| !text.contains(*section)).copied().collect();

    if !fingerprint_matches || !missing_sections.is_empty() {
        return Err(TsqError::new(ErrorCode::SpecValidationFailed, "attached spec failed validation").with_details(
            serde_json::json!({
                "task_id": id,
                "fingerprint_matches": fingerprint_matches,
                "missing_sections": missing_sections,
            }),
        ));
    }

    Ok(serde_json::json!({ "task_id": id, "ok": true }))
}

fn fingerprint_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Write `bytes` to `dest` via temp-file-then-rename so a crash mid-write
/// never leaves a half-written spec behind.
fn write_spec_file(dest: &Path, bytes: &[u8]) -> Result<(), TsqError> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = dest.with_extension("tmp-attach");
    {
        let mut tmp = std::fs::File::create(&tmp_path)?;
        tmp.write_all(bytes)?;
        tmp.sync_all()?;
    }
    std::fs::rename(&tmp_path, dest)?;
    Ok(())
}
