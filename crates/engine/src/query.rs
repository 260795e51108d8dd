// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `search` query grammar: a small AND-of-terms language with
//! field qualifiers and per-term negation, evaluated directly against a
//! projected [`State`] with no intermediate index — a store's task count
//! never approaches the range where a linear scan needs to be faster.

use crate::error::ValidationError;
use tsq_core::dep::DepType;
use tsq_core::id::TaskId;
use tsq_core::state::State;

/// A recognized `field:value` qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Status,
    Kind,
    Label,
    ExternalRef,
    DiscoveredFrom,
    DepTypeIn,
    DepTypeOut,
    Text,
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "title" => Field::Title,
            "status" => Field::Status,
            "kind" => Field::Kind,
            "label" => Field::Label,
            "external_ref" => Field::ExternalRef,
            "discovered_from" => Field::DiscoveredFrom,
            "dep_type_in" => Field::DepTypeIn,
            "dep_type_out" => Field::DepTypeOut,
            "text" => Field::Text,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TermKind {
    /// One or more contiguous bare words, collapsed into a single
    /// title-text search term.
    Bare(String),
    Field(Field, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Term {
    negated: bool,
    kind: TermKind,
}

/// A parsed search query: an implicit AND of its terms.
#[derive(Debug, Clone, Default)]
pub struct Query {
    terms: Vec<Term>,
}

/// Tokenize respecting double-quoted spans, then group into terms: a
/// recognized `field:value`/`-field:value` token is its own term; runs of
/// plain words collapse into one positive bare term (a `-word` token breaks
/// the run and becomes its own negated bare term, since negation cannot
/// span multiple words under this grammar).
pub fn parse(input: &str) -> Result<Query, ValidationError> {
    let tokens = tokenize(input);
    let mut terms = Vec::new();
    let mut bare_run: Vec<String> = Vec::new();

    let flush = |bare_run: &mut Vec<String>, terms: &mut Vec<Term>| {
        if !bare_run.is_empty() {
            terms.push(Term { negated: false, kind: TermKind::Bare(bare_run.join(" ")) });
            bare_run.clear();
        }
    };

    for token in tokens {
        let (negated, body) = match token.strip_prefix('-') {
            Some(rest) if !rest.is_empty() => (true, rest.to_string()),
            _ => (false, token),
        };

        if let Some((field_name, value)) = split_field(&body) {
            if field_name == "dep_type" {
                return Err(ValidationError::Generic(
                    "dep_type requires a direction: dep_type_in or dep_type_out".to_string(),
                ));
            }
            if let Some(field) = Field::parse(&field_name) {
                flush(&mut bare_run, &mut terms);
                validate_field_value(field, &value)?;
                terms.push(Term { negated, kind: TermKind::Field(field, value) });
                continue;
            }
        }

        if negated {
            flush(&mut bare_run, &mut terms);
            terms.push(Term { negated: true, kind: TermKind::Bare(body) });
        } else {
            bare_run.push(body);
        }
    }
    flush(&mut bare_run, &mut terms);

    Ok(Query { terms })
}

/// Split `field:value` on the first unquoted colon, stripping surrounding
/// quotes from `value`. Returns `None` if there is no colon.
fn split_field(token: &str) -> Option<(String, String)> {
    let (field, rest) = token.split_once(':')?;
    if field.is_empty() {
        return None;
    }
    let value = rest.trim_matches('"').to_string();
    Some((field.to_lowercase(), value))
}

fn validate_field_value(field: Field, value: &str) -> Result<(), ValidationError> {
    match field {
        Field::DepTypeIn | Field::DepTypeOut => parse_dep_type(value).map(|_| ()).ok_or_else(|| {
            ValidationError::Generic(format!("unknown dependency type {value:?} in search query"))
        }),
        _ => Ok(()),
    }
}

fn parse_dep_type(value: &str) -> Option<DepType> {
    match value {
        "blocks" => Some(DepType::Blocks),
        "starts_after" => Some(DepType::StartsAfter),
        _ => None,
    }
}

/// Split `input` into whitespace-delimited tokens, treating a double-quoted
/// span (even one containing whitespace) as a single token.
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Evaluate `query` against `state`, returning matching task ids in
/// `created_order`.
pub fn evaluate(state: &State, query: &Query) -> Vec<TaskId> {
    state
        .created_order
        .iter()
        .filter(|id| query.terms.iter().all(|term| term_matches(state, id, term)))
        .cloned()
        .collect()
}

fn term_matches(state: &State, id: &TaskId, term: &Term) -> bool {
    let matched = match &term.kind {
        TermKind::Bare(text) => matches_text(state, id, text),
        TermKind::Field(field, value) => matches_field(state, id, *field, value),
    };
    matched != term.negated
}

fn matches_text(state: &State, id: &TaskId, needle: &str) -> bool {
    let Some(task) = state.get(id) else { return false };
    let needle = needle.to_lowercase();
    task.title.to_lowercase().contains(&needle)
}

fn matches_field(state: &State, id: &TaskId, field: Field, value: &str) -> bool {
    let Some(task) = state.get(id) else { return false };
    let needle = value.to_lowercase();
    match field {
        Field::Title => task.title.to_lowercase().contains(&needle),
        Field::Text => {
            task.title.to_lowercase().contains(&needle)
                || task.description.as_deref().unwrap_or_default().to_lowercase().contains(&needle)
                || task.notes.iter().any(|n| n.text.to_lowercase().contains(&needle))
        }
        Field::Status => task.status.to_string() == needle,
        Field::Kind => task.kind.to_string() == needle,
        Field::Label => task.labels.iter().any(|l| l.as_str() == needle),
        Field::ExternalRef => task.external_ref.as_deref().unwrap_or_default().to_lowercase() == needle,
        Field::DiscoveredFrom => task.discovered_from.as_ref().map(|from| from.as_str()) == Some(value),
        // `_in`: edges pointing at this task (others depend on it).
        Field::DepTypeIn => {
            let Some(dep_type) = parse_dep_type(value) else { return false };
            state
                .created_order
                .iter()
                .flat_map(|other| state.deps_of(other))
                .any(|edge| &edge.to == id && edge.dep_type == dep_type)
        }
        // `_out`: edges this task owns (it depends on others).
        Field::DepTypeOut => {
            let Some(dep_type) = parse_dep_type(value) else { return false };
            state.deps_of(id).any(|edge| edge.dep_type == dep_type)
        }
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
