// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer job state machine
//!
//! A `TimerJob` counts down from `delay` while Started and spawns its
//! primary command on reaching zero. Every mutating operation returns the
//! effects to execute, in order; hook spawns always precede the state
//! transition they belong to, and a field-specific event always precedes
//! the generic `Changed` event.

use crate::effect::Effect;
use crate::event::{Field, JobEvent};
use crate::id::{JobId, ProcessId};
use serde::{Deserialize, Serialize};

/// Configured countdown length for a fresh job, in seconds
pub const DEFAULT_DELAY: u32 = 100;

/// The state of a timer job; exactly one holds at any time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Stopped,
    Paused,
    Started,
}

impl JobState {
    /// Declaration-order ordinal used by the persisted `State` entry
    pub fn ordinal(self) -> i64 {
        match self {
            JobState::Stopped => 0,
            JobState::Paused => 1,
            JobState::Started => 2,
        }
    }

    /// Inverse of [`ordinal`](Self::ordinal); unknown values fall back to Stopped
    pub fn from_ordinal(ordinal: i64) -> Self {
        match ordinal {
            1 => JobState::Paused,
            2 => JobState::Started,
            _ => JobState::Stopped,
        }
    }
}

/// Persistable field values of a job, without runtime bookkeeping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSnapshot {
    pub delay: u32,
    pub value: u32,
    pub state: JobState,
    pub command: String,
    pub on_schedule: String,
    pub on_pause: String,
    pub on_resume: String,
    pub on_stop: String,
    pub on_success: String,
    pub on_failure: String,
    pub loop_enabled: bool,
    pub one_instance: bool,
    pub consecutive: bool,
}

impl Default for JobSnapshot {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DELAY,
            value: DEFAULT_DELAY,
            state: JobState::Stopped,
            command: String::new(),
            on_schedule: String::new(),
            on_pause: String::new(),
            on_resume: String::new(),
            on_stop: String::new(),
            on_success: String::new(),
            on_failure: String::new(),
            loop_enabled: false,
            one_instance: true,
            consecutive: false,
        }
    }
}

/// A configured countdown timer with an associated command and hooks
#[derive(Debug, Clone)]
pub struct TimerJob {
    id: JobId,
    delay: u32,
    value: u32,
    state: JobState,
    command: String,
    on_schedule: String,
    on_pause: String,
    on_resume: String,
    on_stop: String,
    on_success: String,
    on_failure: String,
    loop_enabled: bool,
    one_instance: bool,
    consecutive: bool,
    /// In-flight tracked spawns of `command`
    handles: Vec<ProcessId>,
    next_handle: u64,
}

impl TimerJob {
    /// Create a job with default settings and a fresh id
    pub fn new() -> Self {
        Self::restore(JobId::generate(), JobSnapshot::default())
    }

    /// Rebuild a job from persisted field values
    pub fn restore(id: JobId, snapshot: JobSnapshot) -> Self {
        Self {
            id,
            delay: snapshot.delay,
            // Malformed stores are defaulted, never fatal
            value: snapshot.value.min(snapshot.delay),
            state: snapshot.state,
            command: snapshot.command,
            on_schedule: snapshot.on_schedule,
            on_pause: snapshot.on_pause,
            on_resume: snapshot.on_resume,
            on_stop: snapshot.on_stop,
            on_success: snapshot.on_success,
            on_failure: snapshot.on_failure,
            loop_enabled: snapshot.loop_enabled,
            one_instance: snapshot.one_instance,
            consecutive: snapshot.consecutive,
            handles: Vec::new(),
            next_handle: 0,
        }
    }

    /// Current field values for persistence
    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            delay: self.delay,
            value: self.value,
            state: self.state,
            command: self.command.clone(),
            on_schedule: self.on_schedule.clone(),
            on_pause: self.on_pause.clone(),
            on_resume: self.on_resume.clone(),
            on_stop: self.on_stop.clone(),
            on_success: self.on_success.clone(),
            on_failure: self.on_failure.clone(),
            loop_enabled: self.loop_enabled,
            one_instance: self.one_instance,
            consecutive: self.consecutive,
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn delay(&self) -> u32 {
        self.delay
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn on_schedule(&self) -> &str {
        &self.on_schedule
    }

    pub fn on_pause(&self) -> &str {
        &self.on_pause
    }

    pub fn on_resume(&self) -> &str {
        &self.on_resume
    }

    pub fn on_stop(&self) -> &str {
        &self.on_stop
    }

    pub fn on_success(&self) -> &str {
        &self.on_success
    }

    pub fn on_failure(&self) -> &str {
        &self.on_failure
    }

    pub fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    pub fn one_instance(&self) -> bool {
        self.one_instance
    }

    pub fn consecutive(&self) -> bool {
        self.consecutive
    }

    /// Tracked spawns still running
    pub fn handles(&self) -> &[ProcessId] {
        &self.handles
    }

    // --- lifecycle operations ---

    /// Start or resume the countdown.
    ///
    /// Fires `on_resume` when resuming from Paused, `on_schedule`
    /// otherwise; the hook spawn precedes the state change.
    pub fn start(&mut self) -> Vec<Effect> {
        let hook = if self.state == JobState::Paused {
            &self.on_resume
        } else {
            &self.on_schedule
        };
        let mut effects = hook_effects(hook);
        effects.extend(self.set_state(JobState::Started));
        effects
    }

    /// Pause the countdown, preserving the remaining value
    pub fn pause(&mut self) -> Vec<Effect> {
        let mut effects = hook_effects(&self.on_pause);
        effects.extend(self.set_state(JobState::Paused));
        effects
    }

    /// Stop the countdown and reset the remaining value to `delay`
    pub fn stop(&mut self) -> Vec<Effect> {
        let mut effects = hook_effects(&self.on_stop);
        effects.extend(self.set_state(JobState::Stopped));
        effects
    }

    /// Stop when Started, start otherwise.
    ///
    /// Deliberately conflates pause and stop, matching the reference
    /// behavior; a Paused job toggles to Started.
    pub fn toggle(&mut self) -> Vec<Effect> {
        if self.state == JobState::Started {
            self.stop()
        } else {
            self.start()
        }
    }

    // --- setters (skip when unchanged, then FieldChanged before Changed) ---

    /// Change state directly. No-op when the state is unchanged: no
    /// events, no tick effects, no value reset.
    pub fn set_state(&mut self, state: JobState) -> Vec<Effect> {
        if self.state == state {
            return Vec::new();
        }

        let mut effects = Vec::new();
        if state == JobState::Started {
            effects.push(Effect::StartTick {
                job: self.id.clone(),
            });
        } else if self.state == JobState::Started {
            effects.push(Effect::StopTick {
                job: self.id.clone(),
            });
        }

        if state == JobState::Stopped {
            let delay = self.delay;
            effects.extend(self.set_value(delay));
        }

        self.state = state;
        effects.extend(self.field_changed(Field::State));
        effects
    }

    /// Update the configured countdown length.
    ///
    /// When Stopped the idle value follows the new delay; otherwise the
    /// value is truncated if the new delay no longer covers it.
    pub fn set_delay(&mut self, delay: u32) -> Vec<Effect> {
        if self.delay == delay {
            return Vec::new();
        }
        self.delay = delay;

        let mut effects = if self.state == JobState::Stopped || self.value > delay {
            self.set_value(delay)
        } else {
            Vec::new()
        };
        effects.extend(self.field_changed(Field::Delay));
        effects
    }

    /// Set the remaining seconds, clamped to `delay`
    pub fn set_value(&mut self, value: u32) -> Vec<Effect> {
        let value = value.min(self.delay);
        if self.value == value {
            return Vec::new();
        }
        self.value = value;
        self.field_changed(Field::Value)
    }

    pub fn set_command(&mut self, command: impl Into<String>) -> Vec<Effect> {
        let command = command.into();
        if self.command == command {
            return Vec::new();
        }
        self.command = command;
        self.field_changed(Field::Command)
    }

    pub fn set_on_schedule(&mut self, command: impl Into<String>) -> Vec<Effect> {
        let command = command.into();
        if self.on_schedule == command {
            return Vec::new();
        }
        self.on_schedule = command;
        self.field_changed(Field::OnSchedule)
    }

    pub fn set_on_pause(&mut self, command: impl Into<String>) -> Vec<Effect> {
        let command = command.into();
        if self.on_pause == command {
            return Vec::new();
        }
        self.on_pause = command;
        self.field_changed(Field::OnPause)
    }

    pub fn set_on_resume(&mut self, command: impl Into<String>) -> Vec<Effect> {
        let command = command.into();
        if self.on_resume == command {
            return Vec::new();
        }
        self.on_resume = command;
        self.field_changed(Field::OnResume)
    }

    pub fn set_on_stop(&mut self, command: impl Into<String>) -> Vec<Effect> {
        let command = command.into();
        if self.on_stop == command {
            return Vec::new();
        }
        self.on_stop = command;
        self.field_changed(Field::OnStop)
    }

    pub fn set_on_success(&mut self, command: impl Into<String>) -> Vec<Effect> {
        let command = command.into();
        if self.on_success == command {
            return Vec::new();
        }
        self.on_success = command;
        self.field_changed(Field::OnSuccess)
    }

    pub fn set_on_failure(&mut self, command: impl Into<String>) -> Vec<Effect> {
        let command = command.into();
        if self.on_failure == command {
            return Vec::new();
        }
        self.on_failure = command;
        self.field_changed(Field::OnFailure)
    }

    pub fn set_loop(&mut self, loop_enabled: bool) -> Vec<Effect> {
        if self.loop_enabled == loop_enabled {
            return Vec::new();
        }
        self.loop_enabled = loop_enabled;
        self.field_changed(Field::Loop)
    }

    pub fn set_one_instance(&mut self, one_instance: bool) -> Vec<Effect> {
        if self.one_instance == one_instance {
            return Vec::new();
        }
        self.one_instance = one_instance;
        self.field_changed(Field::OneInstance)
    }

    pub fn set_consecutive(&mut self, consecutive: bool) -> Vec<Effect> {
        if self.consecutive == consecutive {
            return Vec::new();
        }
        self.consecutive = consecutive;
        self.field_changed(Field::Consecutive)
    }

    // --- tick and process handling ---

    /// One-second tick while Started.
    ///
    /// Decrements the remaining value; on reaching exactly zero, fires
    /// the primary command, then either loops back to `delay` or stops
    /// (which resets the value again — inherited observable behavior).
    pub fn tick(&mut self) -> Vec<Effect> {
        if self.state != JobState::Started || self.value == 0 {
            return Vec::new();
        }

        let mut effects = self.set_value(self.value - 1);
        if self.value == 0 {
            effects.extend(self.fire());
            if self.loop_enabled {
                let delay = self.delay;
                effects.extend(self.set_value(delay));
            } else {
                effects.extend(self.stop());
            }
        }
        effects
    }

    /// Spawn the primary command at countdown zero.
    ///
    /// Skipped entirely while a tracked instance is running and
    /// `one_instance` is set. An empty (trimmed) command is a strict
    /// no-op: no handle, no event, no error.
    fn fire(&mut self) -> Vec<Effect> {
        if self.one_instance && !self.handles.is_empty() {
            return Vec::new();
        }
        if self.command.trim().is_empty() {
            return Vec::new();
        }

        self.next_handle += 1;
        let handle = ProcessId(self.next_handle);
        self.handles.push(handle);

        vec![
            Effect::Spawn {
                job: self.id.clone(),
                handle,
                command: self.command.clone(),
            },
            Effect::Emit(JobEvent::Fired {
                job: self.id.clone(),
            }),
        ]
    }

    /// A tracked spawn exited; fires `on_success` or `on_failure` and
    /// always reports `Finished`
    pub fn process_exited(&mut self, handle: ProcessId, success: bool) -> Vec<Effect> {
        self.handles.retain(|h| *h != handle);

        let mut effects = Vec::new();
        if success {
            effects.extend(hook_effects(&self.on_success));
        } else {
            effects.push(Effect::Emit(JobEvent::Error {
                job: self.id.clone(),
            }));
            effects.extend(hook_effects(&self.on_failure));
        }
        effects.push(Effect::Emit(JobEvent::Finished {
            job: self.id.clone(),
            error: !success,
        }));
        effects
    }

    /// A tracked spawn could not be started at all
    pub fn spawn_failed(&mut self, handle: ProcessId) -> Vec<Effect> {
        self.handles.retain(|h| *h != handle);
        vec![
            Effect::Emit(JobEvent::Error {
                job: self.id.clone(),
            }),
            Effect::Emit(JobEvent::Finished {
                job: self.id.clone(),
                error: true,
            }),
        ]
    }

    fn field_changed(&self, field: Field) -> Vec<Effect> {
        vec![
            Effect::Emit(JobEvent::FieldChanged {
                job: self.id.clone(),
                field,
            }),
            Effect::Emit(JobEvent::Changed {
                job: self.id.clone(),
            }),
        ]
    }
}

impl Default for TimerJob {
    fn default() -> Self {
        Self::new()
    }
}

/// Effects for a lifecycle hook command: fire-and-forget, untracked,
/// skipped when the trimmed command is empty
fn hook_effects(command: &str) -> Vec<Effect> {
    if command.trim().is_empty() {
        Vec::new()
    } else {
        vec![Effect::SpawnHook {
            command: command.to_string(),
        }]
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
