// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event types for the fuse job engine
//!
//! The collaborator subscribes to these instead of wiring per-field
//! signal/slot connections. For a single mutation the `FieldChanged`
//! event is always published before the generic `Changed` event.

use crate::id::JobId;
use serde::{Deserialize, Serialize};

/// The job field a `FieldChanged` event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Delay,
    Value,
    State,
    Command,
    OnSchedule,
    OnPause,
    OnResume,
    OnStop,
    OnSuccess,
    OnFailure,
    Loop,
    OneInstance,
    Consecutive,
}

/// Notifications published by the engine to subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobEvent {
    /// A specific field of a job changed
    FieldChanged { job: JobId, field: Field },

    /// Generic "job changed" notification, follows every field change
    Changed { job: JobId },

    /// The primary command was spawned after the countdown reached zero
    Fired { job: JobId },

    /// A tracked spawn failed to start or exited unsuccessfully
    Error { job: JobId },

    /// A tracked spawn finished; `error` is true on spawn or exit failure
    Finished { job: JobId, error: bool },
}

impl JobEvent {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            JobEvent::FieldChanged { .. } => "field_changed",
            JobEvent::Changed { .. } => "changed",
            JobEvent::Fired { .. } => "fired",
            JobEvent::Error { .. } => "error",
            JobEvent::Finished { .. } => "finished",
        }
    }

    /// The job this event concerns
    pub fn job(&self) -> &JobId {
        match self {
            JobEvent::FieldChanged { job, .. }
            | JobEvent::Changed { job }
            | JobEvent::Fired { job }
            | JobEvent::Error { job }
            | JobEvent::Finished { job, .. } => job,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
