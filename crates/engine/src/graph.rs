// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Graph algorithms over the projected [`State`].

use indexmap::IndexMap;
use std::collections::{HashSet, VecDeque};
use tsq_core::dep::DepType;
use tsq_core::id::TaskId;
use tsq_core::state::State;
use tsq_core::task::TaskStatus;

/// True if `blocker` is reachable from `child` via `blocks`-typed edges,
/// meaning `dep.added(child, blocker, blocks)` would close a cycle.
///
/// Searches forward from `blocker` over the blocks-graph and checks whether
/// `child` turns up.
pub fn would_create_cycle(state: &State, child: &TaskId, blocker: &TaskId) -> bool {
    if child == blocker {
        return true;
    }
    let mut seen = HashSet::new();
    let mut stack = vec![blocker.clone()];
    while let Some(current) = stack.pop() {
        if !seen.insert(current.clone()) {
            continue;
        }
        if &current == child {
            return true;
        }
        for edge in state.deps_of(&current) {
            if edge.dep_type == DepType::Blocks {
                stack.push(edge.to.clone());
            }
        }
    }
    false
}

/// True if marking `source` a duplicate of `canonical` would close a cycle
/// in the `duplicate_of` chain.
pub fn would_create_duplicate_cycle(state: &State, source: &TaskId, canonical: &TaskId) -> bool {
    let mut current = canonical.clone();
    let mut hops = 0usize;
    loop {
        if &current == source {
            return true;
        }
        let Some(task) = state.get(&current) else { return false };
        let Some(next) = task.duplicate_of.clone() else { return false };
        current = next;
        hops += 1;
        if hops > state.tasks.len() {
            // Already-corrupt state with an existing cycle; don't spin.
            return true;
        }
    }
}

/// A task is ready iff open/in_progress and every `blocks`-typed blocker is
/// present and closed/canceled.
pub fn is_ready(state: &State, id: &TaskId) -> bool {
    let Some(task) = state.get(id) else { return false };
    if !task.status.is_workable() {
        return false;
    }
    for edge in state.deps_of(id) {
        if edge.dep_type != DepType::Blocks {
            continue;
        }
        match state.get(&edge.to) {
            Some(blocker) if blocker.status.satisfies_blocker() => {}
            _ => return false,
        }
    }
    true
}

/// All ready tasks, in `created_order`.
pub fn list_ready(state: &State) -> Vec<&TaskId> {
    state.created_order.iter().filter(|id| is_ready(state, id)).collect()
}

/// One entry of the dependents index: a task blocked by `blocker`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependent {
    pub child: TaskId,
    pub dep_type: DepType,
}

/// Build `dependents[blocker] -> [(child, dep_type)]` by scanning `deps`
///.
pub fn dependents_index(state: &State) -> IndexMap<TaskId, Vec<Dependent>> {
    let mut index: IndexMap<TaskId, Vec<Dependent>> = IndexMap::new();
    for id in &state.created_order {
        for edge in state.deps_of(id) {
            index.entry(edge.to.clone()).or_default().push(Dependent {
                child: edge.from.clone(),
                dep_type: edge.dep_type,
            });
        }
    }
    index
}

/// Normalize a title for duplicate-candidate grouping: lower-case, collapse
/// runs of non-alphanumerics to a single space, trim.
fn normalize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut last_was_space = true;
    for ch in title.chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            last_was_space = false;
        } else if !last_was_space {
            out.push(' ');
            last_was_space = true;
        }
    }
    out.trim_end().to_string()
}

/// Groups of ≥2 active tasks (not closed/canceled) sharing a normalized
/// title, capped at `limit` groups, largest group first.
pub fn duplicate_candidates(state: &State, limit: usize) -> Vec<Vec<TaskId>> {
    let mut groups: IndexMap<String, Vec<TaskId>> = IndexMap::new();
    for id in &state.created_order {
        let Some(task) = state.get(id) else { continue };
        if task.is_closed_like() {
            continue;
        }
        groups.entry(normalize_title(&task.title)).or_default().push(id.clone());
    }
    let mut candidates: Vec<Vec<TaskId>> =
        groups.into_values().filter(|group| group.len() >= 2).collect();
    candidates.sort_by(|a, b| b.len().cmp(&a.len()));
    candidates.truncate(limit);
    candidates
}

/// One node of a parent/child forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: TaskId,
    pub children: Vec<TreeNode>,
}

/// Build a parent/child forest from `ids` using `parent_id`. A task whose
/// parent is not itself in `ids` becomes a root.
pub fn build_tree(state: &State, ids: &[TaskId]) -> Vec<TreeNode> {
    let in_set: HashSet<&TaskId> = ids.iter().collect();
    let mut children_of: IndexMap<TaskId, Vec<TaskId>> = IndexMap::new();
    let mut roots: Vec<TaskId> = Vec::new();

    for id in ids {
        let Some(task) = state.get(id) else { continue };
        match &task.parent_id {
            Some(parent) if in_set.contains(parent) => {
                children_of.entry(parent.clone()).or_default().push(id.clone());
            }
            _ => roots.push(id.clone()),
        }
    }

    fn sort_by_created_order(state: &State, ids: &mut [TaskId]) {
        ids.sort_by_key(|id| state.created_order.iter().position(|x| x == id).unwrap_or(usize::MAX));
    }

    fn build_node(state: &State, id: TaskId, children_of: &IndexMap<TaskId, Vec<TaskId>>) -> TreeNode {
        let mut kids = children_of.get(&id).cloned().unwrap_or_default();
        sort_by_created_order(state, &mut kids);
        let children = kids.into_iter().map(|child| build_node(state, child, children_of)).collect();
        TreeNode { id, children }
    }

    sort_by_created_order(state, &mut roots);
    roots.into_iter().map(|id| build_node(state, id, &children_of)).collect()
}

/// Breadth-first walk of the forest's ids, roots first then each level.
pub fn flatten_tree(nodes: &[TreeNode]) -> Vec<TaskId> {
    let mut out = Vec::new();
    let mut queue: VecDeque<&TreeNode> = nodes.iter().collect();
    while let Some(node) = queue.pop_front() {
        out.push(node.id.clone());
        for child in &node.children {
            queue.push_back(child);
        }
    }
    out
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
