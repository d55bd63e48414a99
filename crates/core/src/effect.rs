// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Side actions requested by the job state machine
//!
//! `TimerJob` operations mutate the job and return effects in order; the
//! engine executes them. The core never spawns processes or touches
//! timers itself.

use crate::event::JobEvent;
use crate::id::{JobId, ProcessId};

/// An effect to be executed by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Publish an event to subscribers
    Emit(JobEvent),

    /// Spawn the tracked primary command; completion is reported back
    /// keyed by `(job, handle)`
    Spawn {
        job: JobId,
        handle: ProcessId,
        command: String,
    },

    /// Spawn a lifecycle hook command, fire-and-forget
    SpawnHook { command: String },

    /// Start the one-second repeating tick source for a job
    StartTick { job: JobId },

    /// Stop the tick source for a job
    StopTick { job: JobId },
}

impl Effect {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Emit(_) => "emit",
            Effect::Spawn { .. } => "spawn",
            Effect::SpawnHook { .. } => "spawn_hook",
            Effect::StartTick { .. } => "start_tick",
            Effect::StopTick { .. } => "stop_tick",
        }
    }
}
