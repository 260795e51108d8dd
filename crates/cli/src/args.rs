// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `clap`-friendly mirrors of the core domain enums. `tsq-core`'s own enums
//! are `snake_case` over the wire but don't derive `clap::ValueEnum`, so the
//! CLI front-end keeps its own thin copies and converts at the boundary.

use clap::ValueEnum;
use tsq_core::dep::DepType;
use tsq_core::link::RelationKind;
use tsq_core::task::{PlanningState, Priority, TaskKind, TaskStatus};

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum CliTaskKind {
    Task,
    Feature,
    Epic,
}

impl From<CliTaskKind> for TaskKind {
    fn from(value: CliTaskKind) -> Self {
        match value {
            CliTaskKind::Task => TaskKind::Task,
            CliTaskKind::Feature => TaskKind::Feature,
            CliTaskKind::Epic => TaskKind::Epic,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum CliTaskStatus {
    Open,
    InProgress,
    Blocked,
    Closed,
    Canceled,
    Deferred,
}

impl From<CliTaskStatus> for TaskStatus {
    fn from(value: CliTaskStatus) -> Self {
        match value {
            CliTaskStatus::Open => TaskStatus::Open,
            CliTaskStatus::InProgress => TaskStatus::InProgress,
            CliTaskStatus::Blocked => TaskStatus::Blocked,
            CliTaskStatus::Closed => TaskStatus::Closed,
            CliTaskStatus::Canceled => TaskStatus::Canceled,
            CliTaskStatus::Deferred => TaskStatus::Deferred,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum CliDepType {
    Blocks,
    StartsAfter,
}

impl From<CliDepType> for DepType {
    fn from(value: CliDepType) -> Self {
        match value {
            CliDepType::Blocks => DepType::Blocks,
            CliDepType::StartsAfter => DepType::StartsAfter,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum CliRelationKind {
    RelatesTo,
    RepliesTo,
}

impl From<CliRelationKind> for RelationKind {
    fn from(value: CliRelationKind) -> Self {
        match value {
            CliRelationKind::RelatesTo => RelationKind::RelatesTo,
            CliRelationKind::RepliesTo => RelationKind::RepliesTo,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum CliPlanningState {
    NeedsPlanning,
    Planned,
}

impl From<CliPlanningState> for PlanningState {
    fn from(value: CliPlanningState) -> Self {
        match value {
            CliPlanningState::NeedsPlanning => PlanningState::NeedsPlanning,
            CliPlanningState::Planned => PlanningState::Planned,
        }
    }
}

/// Parses a `0`-`3` CLI value into a [`Priority`], rejecting anything else up
/// front rather than deferring to the projector.
pub fn parse_priority(raw: &str) -> Result<Priority, String> {
    let value: u8 = raw.parse().map_err(|_| format!("priority must be 0-3, got {raw:?}"))?;
    Priority::new(value).ok_or_else(|| format!("priority must be 0-3, got {raw:?}"))
}
