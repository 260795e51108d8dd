// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `clap`-derive argument definitions. Intentionally thin front-end over the
//! command layer — one struct per operation.

use crate::args::{CliDepType, CliPlanningState, CliRelationKind, CliTaskKind, CliTaskStatus};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "tsq", version, about = "Tasque: a durable task graph for coding agents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Emit the machine-readable response envelope instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Actor name stamped into emitted events (overrides `TSQ_ACTOR`).
    #[arg(long, global = true)]
    pub actor: Option<String>,

    /// Disable id-prefix resolution: `<id>` arguments must match exactly.
    #[arg(long, global = true)]
    pub exact_id: bool,

    /// Repo directory to search upward from for `.tasque` (defaults to cwd).
    #[arg(long, global = true)]
    pub repo: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a fresh `.tasque/` store in the current (or `--repo`) directory.
    Init,

    Create(CreateArgs),
    Update(UpdateArgs),
    Claim(ClaimArgs),
    Close(CloseArgs),
    Reopen(ReopenArgs),
    Supersede(SupersedeArgs),
    Duplicate(DuplicateArgs),
    Merge(MergeArgs),

    #[command(subcommand)]
    Dep(DepCommand),
    #[command(subcommand)]
    Link(LinkCommand),
    #[command(subcommand)]
    Label(LabelCommand),
    #[command(subcommand)]
    Note(NoteCommand),
    #[command(subcommand)]
    Spec(SpecCommand),

    Show(ShowArgs),
    List(ListArgs),
    Ready(ReadyArgs),
    Stale(StaleArgs),
    History(HistoryArgs),
    Search(SearchArgs),
    Orphans,
    Doctor,
    Repair(RepairArgs),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    pub title: String,
    #[arg(long, value_enum, default_value = "task")]
    pub kind: CliTaskKind,
    #[arg(long, value_parser = crate::args::parse_priority)]
    pub priority: Option<tsq_core::task::Priority>,
    #[arg(long)]
    pub parent: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub external_ref: Option<String>,
    #[arg(long)]
    pub discovered_from: Option<String>,
    #[arg(long, value_enum)]
    pub planning_state: Option<CliPlanningState>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, value_enum)]
    pub status: Option<CliTaskStatus>,
    #[arg(long, value_parser = crate::args::parse_priority)]
    pub priority: Option<tsq_core::task::Priority>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub external_ref: Option<String>,
    #[arg(long, value_enum)]
    pub planning_state: Option<CliPlanningState>,
}

#[derive(Debug, Args)]
pub struct ClaimArgs {
    pub id: String,
    #[arg(long)]
    pub assignee: String,
    /// Reject the claim unless the task already has a spec attached.
    #[arg(long)]
    pub require_spec: bool,
}

#[derive(Debug, Args)]
pub struct CloseArgs {
    #[arg(required = true)]
    pub ids: Vec<String>,
    #[arg(long)]
    pub reason: Option<String>,
}

#[derive(Debug, Args)]
pub struct ReopenArgs {
    #[arg(required = true)]
    pub ids: Vec<String>,
}

#[derive(Debug, Args)]
pub struct SupersedeArgs {
    pub id: String,
    #[arg(long)]
    pub by: String,
}

#[derive(Debug, Args)]
pub struct DuplicateArgs {
    pub id: String,
    #[arg(long)]
    pub of: String,
}

#[derive(Debug, Args)]
pub struct MergeArgs {
    #[arg(required = true)]
    pub sources: Vec<String>,
    #[arg(long)]
    pub into: String,
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Subcommand)]
pub enum DepCommand {
    Add { id: String, #[arg(long)] blocker: String, #[arg(long, value_enum, default_value = "blocks")] dep_type: CliDepType },
    Remove { id: String, #[arg(long)] blocker: String, #[arg(long, value_enum, default_value = "blocks")] dep_type: CliDepType },
}

#[derive(Debug, Subcommand)]
pub enum LinkCommand {
    Add { id: String, #[arg(long)] to: String, #[arg(long, value_enum)] kind: CliRelationKind },
    Remove { id: String, #[arg(long)] to: String, #[arg(long, value_enum)] kind: CliRelationKind },
}

#[derive(Debug, Subcommand)]
pub enum LabelCommand {
    Add { id: String, label: String },
    Remove { id: String, label: String },
}

#[derive(Debug, Subcommand)]
pub enum NoteCommand {
    Add { id: String, text: String },
}

#[derive(Debug, Subcommand)]
pub enum SpecCommand {
    Attach { id: String, #[arg(long)] file: PathBuf },
    Check { id: String },
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long, value_enum)]
    pub status: Option<CliTaskStatus>,
    #[arg(long, value_enum, num_args = 1..)]
    pub statuses: Vec<CliTaskStatus>,
    #[arg(long)]
    pub assignee: Option<String>,
    #[arg(long)]
    pub unassigned: bool,
    #[arg(long)]
    pub external_ref: Option<String>,
    #[arg(long)]
    pub discovered_from: Option<String>,
    #[arg(long, value_enum)]
    pub kind: Option<CliTaskKind>,
    #[arg(long)]
    pub label: Option<String>,
    #[arg(long, num_args = 1..)]
    pub label_any: Vec<String>,
    #[arg(long, value_enum)]
    pub planning_state: Option<CliPlanningState>,
    #[arg(long, num_args = 1..)]
    pub ids: Vec<String>,
    #[arg(long)]
    pub tree: bool,
    #[arg(long)]
    pub full: bool,
}

#[derive(Debug, Args)]
pub struct ReadyArgs {
    #[arg(long, value_enum)]
    pub lane: Option<CliPlanningState>,
}

#[derive(Debug, Args)]
pub struct StaleArgs {
    #[arg(long, default_value_t = 14)]
    pub days: i64,
    #[arg(long, value_enum, num_args = 1..)]
    pub statuses: Vec<CliTaskStatus>,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    pub id: String,
    #[arg(long)]
    pub event_type: Option<String>,
    #[arg(long)]
    pub actor: Option<String>,
    #[arg(long)]
    pub since: Option<String>,
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    pub query: String,
}

#[derive(Debug, Args)]
pub struct RepairArgs {
    #[arg(long)]
    pub fix: bool,
    #[arg(long)]
    pub force_unlock: bool,
}
