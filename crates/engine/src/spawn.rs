// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process spawning behind an adapter trait
//!
//! The engine never talks to the OS directly; it hands commands to a
//! [`ProcessAdapter`] and learns about completions through a channel of
//! [`ProcessEvent`]s keyed by job and handle. `ShellAdapter` is the real
//! implementation; tests use `FakeProcessAdapter`.

use async_trait::async_trait;
use fuse_core::{JobId, ProcessId};
use tokio::sync::mpsc;
use tracing::debug;

/// How a spawned process ended, or why it never started
#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    /// The process ran to completion
    Exited { success: bool },
    /// The process could not be started
    SpawnFailed { error: String },
}

/// Completion notification for a tracked process
#[derive(Debug, Clone)]
pub struct ProcessEvent {
    pub job: JobId,
    pub handle: ProcessId,
    pub outcome: ProcessOutcome,
}

pub type ProcessEventSender = mpsc::UnboundedSender<ProcessEvent>;

/// Launches commands and reports completions
#[async_trait]
pub trait ProcessAdapter: Send + Sync {
    /// Spawn a tracked command for a job. The adapter must deliver
    /// exactly one [`ProcessEvent`] for the (job, handle) pair, whether
    /// the spawn succeeds or not.
    async fn spawn(
        &self,
        job: JobId,
        handle: ProcessId,
        command: String,
        events: ProcessEventSender,
    );

    /// Spawn an untracked hook command. Fire-and-forget: failures are
    /// logged, never reported back.
    async fn spawn_hook(&self, command: String);
}

/// Runs commands through `sh -c`
#[derive(Debug, Default, Clone)]
pub struct ShellAdapter;

impl ShellAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessAdapter for ShellAdapter {
    async fn spawn(
        &self,
        job: JobId,
        handle: ProcessId,
        command: String,
        events: ProcessEventSender,
    ) {
        let spawned = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(&command)
            .spawn();

        match spawned {
            Ok(mut child) => {
                tokio::spawn(async move {
                    let success = match child.wait().await {
                        Ok(status) => status.success(),
                        Err(e) => {
                            debug!(job = %job, error = %e, "failed to wait on child");
                            false
                        }
                    };
                    let _ = events.send(ProcessEvent {
                        job,
                        handle,
                        outcome: ProcessOutcome::Exited { success },
                    });
                });
            }
            Err(e) => {
                debug!(job = %job, command = %command, error = %e, "spawn failed");
                let _ = events.send(ProcessEvent {
                    job,
                    handle,
                    outcome: ProcessOutcome::SpawnFailed {
                        error: e.to_string(),
                    },
                });
            }
        }
    }

    async fn spawn_hook(&self, command: String) {
        match tokio::process::Command::new("sh")
            .arg("-c")
            .arg(&command)
            .spawn()
        {
            Ok(mut child) => {
                // Reap in the background so the hook never zombies
                tokio::spawn(async move {
                    let _ = child.wait().await;
                });
            }
            Err(e) => {
                debug!(command = %command, error = %e, "hook spawn failed");
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    //! In-memory adapter for tests: records spawns and lets the caller
    //! complete them deterministically.

    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    pub struct RecordedSpawn {
        pub job: JobId,
        pub handle: ProcessId,
        pub command: String,
    }

    #[derive(Default)]
    struct FakeState {
        spawns: Vec<RecordedSpawn>,
        hooks: Vec<String>,
        pending: Vec<(JobId, ProcessId, ProcessEventSender)>,
        fail_spawns: bool,
    }

    /// Records every spawn; completions are driven by the test via
    /// [`FakeProcessAdapter::complete`].
    #[derive(Clone, Default)]
    pub struct FakeProcessAdapter {
        state: Arc<Mutex<FakeState>>,
    }

    impl FakeProcessAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every subsequent spawn report a start failure
        pub fn fail_spawns(&self) {
            self.lock().fail_spawns = true;
        }

        pub fn spawns(&self) -> Vec<RecordedSpawn> {
            self.lock().spawns.clone()
        }

        pub fn hooks(&self) -> Vec<String> {
            self.lock().hooks.clone()
        }

        pub fn pending_count(&self) -> usize {
            self.lock().pending.len()
        }

        /// Complete the pending process with the given handle
        pub fn complete(&self, handle: ProcessId, success: bool) {
            let entry = {
                let mut state = self.lock();
                let pos = state.pending.iter().position(|(_, h, _)| *h == handle);
                pos.map(|i| state.pending.remove(i))
            };
            if let Some((job, handle, events)) = entry {
                let _ = events.send(ProcessEvent {
                    job,
                    handle,
                    outcome: ProcessOutcome::Exited { success },
                });
            }
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
            self.state.lock().unwrap_or_else(|e| e.into_inner())
        }
    }

    #[async_trait]
    impl ProcessAdapter for FakeProcessAdapter {
        async fn spawn(
            &self,
            job: JobId,
            handle: ProcessId,
            command: String,
            events: ProcessEventSender,
        ) {
            let fail = {
                let mut state = self.lock();
                state.spawns.push(RecordedSpawn {
                    job: job.clone(),
                    handle,
                    command,
                });
                if state.fail_spawns {
                    true
                } else {
                    state.pending.push((job.clone(), handle, events.clone()));
                    false
                }
            };
            if fail {
                let _ = events.send(ProcessEvent {
                    job,
                    handle,
                    outcome: ProcessOutcome::SpawnFailed {
                        error: "spawn disabled".into(),
                    },
                });
            }
        }

        async fn spawn_hook(&self, command: String) {
            self.lock().hooks.push(command);
        }
    }
}

#[cfg(test)]
#[path = "spawn_tests.rs"]
mod tests;
