// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The projected in-memory structure.
//!
//! Grounded on `oj-storage::state::MaterializedState` — a plain data
//! structure with no behavior of its own beyond the accessors needed by the
//! engine crate. Event application (the actual reducer logic) lives in
//! `tsq-engine::projector`, which is the only thing that mutates a `State`.

use crate::dep::DependencyEdge;
use crate::id::TaskId;
use crate::link::{RelationKind, RelationLink};
use crate::task::Task;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// The fully projected view of every event applied so far.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct State {
    pub tasks: IndexMap<TaskId, Task>,
    #[serde(default)]
    pub deps: HashMap<TaskId, BTreeSet<DependencyEdge>>,
    #[serde(default)]
    pub links: HashMap<TaskId, HashMap<RelationKind, BTreeSet<TaskId>>>,
    /// Next child suffix to allocate for a given parent.
    #[serde(default)]
    pub child_counters: HashMap<TaskId, u64>,
    /// Insertion order of task ids, the tie-breaker for "created-order"
    /// listings.
    #[serde(default)]
    pub created_order: Vec<TaskId>,
    /// Count of events folded into this state.
    #[serde(default)]
    pub applied_events: u64,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn insert_task(&mut self, task: Task) {
        self.created_order.push(task.id.clone());
        self.tasks.insert(task.id.clone(), task);
    }

    pub fn deps_of(&self, id: &TaskId) -> impl Iterator<Item = &DependencyEdge> {
        self.deps.get(id).into_iter().flatten()
    }

    pub fn links_of(&self, id: &TaskId, kind: RelationKind) -> impl Iterator<Item = &TaskId> {
        self.links
            .get(id)
            .and_then(|by_kind| by_kind.get(&kind))
            .into_iter()
            .flatten()
    }

    pub fn add_dep(&mut self, edge: DependencyEdge) {
        self.deps.entry(edge.from.clone()).or_default().insert(edge);
    }

    pub fn remove_dep(&mut self, edge: &DependencyEdge) {
        if let Some(set) = self.deps.get_mut(&edge.from) {
            set.remove(edge);
        }
    }

    pub fn add_link(&mut self, link: RelationLink) {
        self.links
            .entry(link.from.clone())
            .or_default()
            .entry(link.kind)
            .or_default()
            .insert(link.to);
    }

    pub fn remove_link(&mut self, link: &RelationLink) {
        if let Some(by_kind) = self.links.get_mut(&link.from) {
            if let Some(set) = by_kind.get_mut(&link.kind) {
                set.remove(&link.to);
            }
        }
    }

    /// Allocate the next child suffix for `parent`, advancing its counter.
    pub fn next_child_suffix(&mut self, parent: &TaskId) -> u64 {
        let counter = self.child_counters.entry(parent.clone()).or_insert(0);
        *counter += 1;
        *counter
    }

    pub fn bump_applied(&mut self) {
        self.applied_events += 1;
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
