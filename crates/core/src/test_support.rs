// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for tests in downstream crates, gated behind the
//! `test-support` feature so production builds never pull in `proptest`.

use crate::id::TaskId;
use crate::task::{Task, TaskKind, TaskStatus};

/// A task with a deterministic id, for tests that don't care about id
/// generation but need a stable value to assert against.
pub fn fixture_task(id: &str, title: &str) -> Task {
    Task::builder().id(TaskId::from_string(id)).title(title).build()
}

pub fn fixture_task_with_status(id: &str, title: &str, status: TaskStatus) -> Task {
    Task::builder()
        .id(TaskId::from_string(id))
        .title(title)
        .status(status)
        .build()
}

pub fn fixture_epic(id: &str, title: &str) -> Task {
    Task::builder()
        .id(TaskId::from_string(id))
        .title(title)
        .kind(TaskKind::Epic)
        .build()
}

#[cfg(feature = "proptest")]
pub mod strategies {
    use crate::task::Priority;
    use proptest::prelude::*;

    pub fn arb_priority() -> impl Strategy<Value = Priority> {
        (0u8..=3).prop_map(|v| Priority::new(v).expect("0..=3 is always valid"))
    }

    pub fn arb_label_str() -> impl Strategy<Value = String> {
        "[a-z0-9][a-z0-9_-]{0,12}"
    }
}
