// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tsq`: the thin command-line front-end over the task graph engine.
//! Argument-parsing polish and terminal rendering are deliberately minimal —
//! this binary exists so the crate is runnable end-to-end, not as a
//! showcase UX.

mod args;
mod cli;
mod commands;
mod envelope;
mod output;

use clap::Parser;
use cli::{Cli, Command};
use commands::common::Ctx;
use envelope::Envelope;
use tsq_core::error::TsqError;

fn main() {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let command_name = command_label(&cli.command);
    let result = dispatch(&cli);

    let envelope = match result {
        Ok(data) => Envelope::ok(command_name, data),
        Err(err) => Envelope::err(command_name, err),
    };
    let exit_code = if envelope.ok { 0 } else { envelope.error.as_ref().map(TsqError::exit_code).unwrap_or(2) };
    output::render(&envelope, cli.json);
    std::process::exit(exit_code);
}

fn command_label(command: &Command) -> String {
    let name = match command {
        Command::Init => "init",
        Command::Create(_) => "create",
        Command::Update(_) => "update",
        Command::Claim(_) => "claim",
        Command::Close(_) => "close",
        Command::Reopen(_) => "reopen",
        Command::Supersede(_) => "supersede",
        Command::Duplicate(_) => "duplicate",
        Command::Merge(_) => "merge",
        Command::Dep(_) => "dep",
        Command::Link(_) => "link",
        Command::Label(_) => "label",
        Command::Note(_) => "note",
        Command::Spec(_) => "spec",
        Command::Show(_) => "show",
        Command::List(_) => "list",
        Command::Ready(_) => "ready",
        Command::Stale(_) => "stale",
        Command::History(_) => "history",
        Command::Search(_) => "search",
        Command::Orphans => "orphans",
        Command::Doctor => "doctor",
        Command::Repair(_) => "repair",
    };
    format!("tsq {name}")
}

fn dispatch(cli: &Cli) -> Result<serde_json::Value, TsqError> {
    if let Command::Init = cli.command {
        return commands::maintenance::init(cli.repo.clone());
    }

    let ctx = Ctx::discover(cli.repo.clone(), cli.actor.clone(), cli.exact_id)?;
    match &cli.command {
        Command::Init => unreachable!("handled above"),
        Command::Create(args) => commands::lifecycle::create(&ctx, args),
        Command::Update(args) => commands::lifecycle::update(&ctx, args),
        Command::Claim(args) => commands::lifecycle::claim(&ctx, args),
        Command::Close(args) => commands::lifecycle::close(&ctx, args),
        Command::Reopen(args) => commands::lifecycle::reopen(&ctx, args),
        Command::Supersede(args) => commands::lifecycle::supersede(&ctx, args),
        Command::Duplicate(args) => commands::lifecycle::duplicate(&ctx, args),
        Command::Merge(args) => commands::lifecycle::merge(&ctx, args),
        Command::Dep(cmd) => commands::graph::dep(&ctx, cmd),
        Command::Link(cmd) => commands::graph::link(&ctx, cmd),
        Command::Label(cmd) => commands::graph::label(&ctx, cmd),
        Command::Note(cmd) => commands::content::note(&ctx, cmd),
        Command::Spec(cmd) => commands::content::spec(&ctx, cmd),
        Command::Show(args) => commands::query::show(&ctx, args),
        Command::List(args) => commands::query::list(&ctx, args),
        Command::Ready(args) => commands::query::ready(&ctx, args),
        Command::Stale(args) => commands::query::stale(&ctx, args),
        Command::History(args) => commands::query::history(&ctx, args),
        Command::Search(args) => commands::query::search(&ctx, args),
        Command::Orphans => commands::query::orphans(&ctx),
        Command::Doctor => commands::query::doctor(&ctx),
        Command::Repair(args) => commands::maintenance::repair(&ctx, args),
    }
}
