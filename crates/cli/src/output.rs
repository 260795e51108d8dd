// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dual text/JSON rendering of a command's [`Envelope`].
//!
//! Grounded on `oj::output::format_or_json`'s split: `--json` prints the
//! envelope as a single compact line on stdout and nothing on stderr; the
//! human renderer is a plain best-effort pretty-printer, staying generic
//! rather than growing a bespoke layout per command.

use crate::envelope::Envelope;
use serde_json::Value;

pub fn render(envelope: &Envelope, json: bool) {
    if json {
        render_json(envelope);
    } else {
        render_human(envelope);
    }
}

fn render_json(envelope: &Envelope) {
    match serde_json::to_string(envelope) {
        Ok(line) => println!("{line}"),
        Err(err) => eprintln!("INTERNAL_ERROR: failed to serialize response: {err}"),
    }
}

fn render_human(envelope: &Envelope) {
    if !envelope.ok {
        if let Some(error) = &envelope.error {
            eprintln!("{}: {}", error.code, error.message);
            if let Some(details) = &error.details {
                eprintln!("{}", pretty(details));
            }
        }
        return;
    }

    let Some(data) = &envelope.data else {
        return;
    };
    match data {
        Value::Array(items) if items.iter().all(is_task_like) && !items.is_empty() => render_table(items),
        Value::Array(items) if items.is_empty() => println!("(no results)"),
        Value::Object(map) if map.contains_key("tree") => render_tree(&map["tree"], 0),
        Value::String(text) => println!("{text}"),
        other => println!("{}", pretty(other)),
    }
}

fn is_task_like(value: &Value) -> bool {
    matches!(value, Value::Object(map) if map.contains_key("id") && map.contains_key("status"))
}

fn render_table(items: &[Value]) {
    for item in items {
        let Value::Object(map) = item else { continue };
        let id = map.get("id").and_then(Value::as_str).unwrap_or("?");
        let status = map.get("status").and_then(Value::as_str).unwrap_or("?");
        let priority = map.get("priority").and_then(Value::as_u64).unwrap_or(2);
        let title = map.get("title").and_then(Value::as_str).unwrap_or("");
        println!("{id:<20} {status:<12} p{priority} {title}");
    }
}

fn render_tree(value: &Value, depth: usize) {
    let Value::Array(nodes) = value else { return };
    for node in nodes {
        let Value::Object(map) = node else { continue };
        let id = map.get("id").and_then(Value::as_str).unwrap_or("?");
        let title = map.get("title").and_then(Value::as_str).unwrap_or("");
        println!("{}{id} {title}", "  ".repeat(depth));
        if let Some(children) = map.get("children") {
            render_tree(children, depth + 1);
        }
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
