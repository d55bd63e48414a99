// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine: owns the registry and executes job effects
//!
//! All mutation goes through the `Engine`, which runs each job operation,
//! then drains the returned effects: events to the bus, commands to the
//! process adapter, tick sources to the scheduler. Consecutive chaining
//! happens here, when a `Finished` event passes through.

use crate::error::EngineError;
use crate::scheduler::TickScheduler;
use crate::spawn::{ProcessAdapter, ProcessEvent, ProcessEventSender, ProcessOutcome};
use fuse_core::{
    Clock, Effect, EventBus, EventReceiver, JobEvent, JobId, JobRegistry, TimerJob,
};
use fuse_storage::{load_registry, save_registry, ConfigStore};
use std::collections::VecDeque;
use std::path::Path;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, trace};

pub struct Engine<A: ProcessAdapter, C: Clock> {
    registry: JobRegistry,
    scheduler: TickScheduler,
    bus: EventBus,
    adapter: A,
    clock: C,
    proc_tx: ProcessEventSender,
    proc_rx: mpsc::UnboundedReceiver<ProcessEvent>,
}

impl<A: ProcessAdapter, C: Clock> Engine<A, C> {
    pub fn new(adapter: A, clock: C) -> Self {
        let (proc_tx, proc_rx) = mpsc::unbounded_channel();
        Self {
            registry: JobRegistry::new(),
            scheduler: TickScheduler::new(),
            bus: EventBus::new(),
            adapter,
            clock,
            proc_tx,
            proc_rx,
        }
    }

    /// Subscribe to all job events
    pub fn subscribe(&self) -> EventReceiver {
        self.bus.subscribe()
    }

    /// Create a new job with default settings
    pub fn add_job(&mut self) -> JobId {
        let id = self.registry.add();
        self.bus.publish(JobEvent::Changed { job: id.clone() });
        id
    }

    /// Remove a job. Its tick source is cancelled; completions from
    /// processes it already spawned are ignored when they arrive.
    pub fn remove_job(&mut self, id: &JobId) -> Result<(), EngineError> {
        match self.registry.remove(id) {
            Some(_) => {
                self.scheduler.cancel(id);
                Ok(())
            }
            None => Err(EngineError::JobNotFound(id.clone())),
        }
    }

    pub fn job(&self, id: &JobId) -> Option<&TimerJob> {
        self.registry.get(id)
    }

    pub fn jobs(&self) -> impl Iterator<Item = &TimerJob> {
        self.registry.iter()
    }

    pub fn show_seconds(&self) -> bool {
        self.registry.show_seconds()
    }

    pub fn set_show_seconds(&mut self, show_seconds: bool) {
        self.registry.set_show_seconds(show_seconds);
    }

    // ---- lifecycle -------------------------------------------------

    pub async fn start(&mut self, id: &JobId) -> Result<(), EngineError> {
        self.with_job(id, TimerJob::start).await
    }

    pub async fn pause(&mut self, id: &JobId) -> Result<(), EngineError> {
        self.with_job(id, TimerJob::pause).await
    }

    pub async fn stop(&mut self, id: &JobId) -> Result<(), EngineError> {
        self.with_job(id, TimerJob::stop).await
    }

    pub async fn toggle(&mut self, id: &JobId) -> Result<(), EngineError> {
        self.with_job(id, TimerJob::toggle).await
    }

    // ---- settings --------------------------------------------------

    pub async fn set_delay(&mut self, id: &JobId, delay: u32) -> Result<(), EngineError> {
        self.with_job(id, |job| job.set_delay(delay)).await
    }

    pub async fn set_value(&mut self, id: &JobId, value: u32) -> Result<(), EngineError> {
        self.with_job(id, |job| job.set_value(value)).await
    }

    pub async fn set_command(&mut self, id: &JobId, command: &str) -> Result<(), EngineError> {
        self.with_job(id, |job| job.set_command(command)).await
    }

    pub async fn set_on_schedule(&mut self, id: &JobId, command: &str) -> Result<(), EngineError> {
        self.with_job(id, |job| job.set_on_schedule(command)).await
    }

    pub async fn set_on_pause(&mut self, id: &JobId, command: &str) -> Result<(), EngineError> {
        self.with_job(id, |job| job.set_on_pause(command)).await
    }

    pub async fn set_on_resume(&mut self, id: &JobId, command: &str) -> Result<(), EngineError> {
        self.with_job(id, |job| job.set_on_resume(command)).await
    }

    pub async fn set_on_stop(&mut self, id: &JobId, command: &str) -> Result<(), EngineError> {
        self.with_job(id, |job| job.set_on_stop(command)).await
    }

    pub async fn set_on_success(&mut self, id: &JobId, command: &str) -> Result<(), EngineError> {
        self.with_job(id, |job| job.set_on_success(command)).await
    }

    pub async fn set_on_failure(&mut self, id: &JobId, command: &str) -> Result<(), EngineError> {
        self.with_job(id, |job| job.set_on_failure(command)).await
    }

    pub async fn set_loop(&mut self, id: &JobId, loop_enabled: bool) -> Result<(), EngineError> {
        self.with_job(id, |job| job.set_loop(loop_enabled)).await
    }

    pub async fn set_one_instance(
        &mut self,
        id: &JobId,
        one_instance: bool,
    ) -> Result<(), EngineError> {
        self.with_job(id, |job| job.set_one_instance(one_instance))
            .await
    }

    pub async fn set_consecutive(
        &mut self,
        id: &JobId,
        consecutive: bool,
    ) -> Result<(), EngineError> {
        self.with_job(id, |job| job.set_consecutive(consecutive))
            .await
    }

    // ---- driving ---------------------------------------------------

    /// Drain pending process completions, then deliver any due ticks
    pub async fn poll(&mut self) {
        while let Ok(event) = self.proc_rx.try_recv() {
            self.handle_process_event(event).await;
        }
        self.tick_due().await;
    }

    /// The next tick deadline, if any countdown is running
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_fire_time()
    }

    /// Run the engine until the surrounding task is dropped, reacting to
    /// process completions and tick deadlines as they come
    pub async fn run(&mut self) {
        loop {
            let deadline = self.scheduler.next_fire_time();
            tokio::select! {
                Some(event) = self.proc_rx.recv() => {
                    self.handle_process_event(event).await;
                }
                () = sleep_until_opt(deadline) => {
                    self.tick_due().await;
                }
            }
        }
    }

    /// Apply one process completion to its job
    pub async fn handle_process_event(&mut self, event: ProcessEvent) {
        let effects = match self.registry.get_mut(&event.job) {
            Some(job) => match event.outcome {
                ProcessOutcome::Exited { success } => job.process_exited(event.handle, success),
                ProcessOutcome::SpawnFailed { error } => {
                    debug!(job = %event.job, %error, "command failed to start");
                    job.spawn_failed(event.handle)
                }
            },
            None => {
                debug!(job = %event.job, "completion for removed job ignored");
                return;
            }
        };
        self.execute(effects).await;
    }

    async fn tick_due(&mut self) {
        let now = self.clock.now();
        for id in self.scheduler.poll(now) {
            let Some(job) = self.registry.get_mut(&id) else {
                // Removed while a tick was in flight
                self.scheduler.cancel(&id);
                continue;
            };
            let effects = job.tick();
            self.execute(effects).await;
        }
    }

    // ---- persistence -----------------------------------------------

    /// Write the registry into a config store
    pub fn save(&self, store: &mut ConfigStore) {
        save_registry(store, &self.registry, self.clock.now_unix());
    }

    /// Replace the registry with the jobs in a config store. Jobs saved
    /// while running resume their countdown; each loaded job gets a
    /// `Changed` event.
    pub fn load(&mut self, store: &ConfigStore) {
        self.registry = load_registry(store, self.clock.now_unix());
        let now = self.clock.now();
        for job in self.registry.iter() {
            if job.state() == fuse_core::JobState::Started {
                self.scheduler.schedule(job.id().clone(), now);
            }
            self.bus.publish(JobEvent::Changed {
                job: job.id().clone(),
            });
        }
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let mut store = ConfigStore::new();
        self.save(&mut store);
        store.save_path(path)?;
        Ok(())
    }

    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let store = ConfigStore::load_path(path)?;
        self.load(&store);
        Ok(())
    }

    // ---- internals -------------------------------------------------

    async fn with_job<F>(&mut self, id: &JobId, op: F) -> Result<(), EngineError>
    where
        F: FnOnce(&mut TimerJob) -> Vec<Effect>,
    {
        let effects = {
            let job = self
                .registry
                .get_mut(id)
                .ok_or_else(|| EngineError::JobNotFound(id.clone()))?;
            op(job)
        };
        self.execute(effects).await;
        Ok(())
    }

    /// Execute effects in order. Effects produced along the way (the
    /// consecutive follower's start) are queued behind the current batch.
    async fn execute(&mut self, effects: Vec<Effect>) {
        let mut work: VecDeque<Effect> = effects.into();
        while let Some(effect) = work.pop_front() {
            trace!(effect = effect.name(), "execute");
            match effect {
                Effect::Emit(event) => {
                    let follower = match &event {
                        JobEvent::Finished { job, .. } => self
                            .registry
                            .consecutive_follower(job)
                            .map(|next| next.id().clone()),
                        _ => None,
                    };
                    self.bus.publish(event);
                    if let Some(next) = follower {
                        if let Some(job) = self.registry.get_mut(&next) {
                            work.extend(job.start());
                        }
                    }
                }
                Effect::Spawn {
                    job,
                    handle,
                    command,
                } => {
                    self.adapter
                        .spawn(job, handle, command, self.proc_tx.clone())
                        .await;
                }
                Effect::SpawnHook { command } => {
                    self.adapter.spawn_hook(command).await;
                }
                Effect::StartTick { job } => {
                    self.scheduler.schedule(job, self.clock.now());
                }
                Effect::StopTick { job } => {
                    self.scheduler.cancel(&job);
                }
            }
        }
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
