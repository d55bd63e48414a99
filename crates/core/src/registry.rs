// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered job collection
//!
//! Order is significant: it defines the persistence slot numbering
//! (`Job0`, `Job1`, ...) and the adjacency used by consecutive chaining.

use crate::id::JobId;
use crate::job::TimerJob;

/// Ordered sequence of timer jobs plus the presentation-only
/// "show seconds" display flag
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: Vec<TimerJob>,
    show_seconds: bool,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a job with default settings, returning its id
    pub fn add(&mut self) -> JobId {
        let job = TimerJob::new();
        let id = job.id().clone();
        self.jobs.push(job);
        id
    }

    /// Append an already-built job (used when loading from a store)
    pub fn push(&mut self, job: TimerJob) {
        self.jobs.push(job);
    }

    /// Remove a job. Tracked child processes are detached, not killed;
    /// their completion reports are dropped by the engine.
    pub fn remove(&mut self, id: &JobId) -> Option<TimerJob> {
        let index = self.position(id)?;
        Some(self.jobs.remove(index))
    }

    pub fn get(&self, id: &JobId) -> Option<&TimerJob> {
        self.jobs.iter().find(|j| j.id() == id)
    }

    pub fn get_mut(&mut self, id: &JobId) -> Option<&mut TimerJob> {
        self.jobs.iter_mut().find(|j| j.id() == id)
    }

    /// Position of a job in collection order
    pub fn position(&self, id: &JobId) -> Option<usize> {
        self.jobs.iter().position(|j| j.id() == id)
    }

    /// The job immediately following `id`, when that follower has opted
    /// into consecutive chaining
    pub fn consecutive_follower(&self, id: &JobId) -> Option<&TimerJob> {
        let next = self.jobs.get(self.position(id)? + 1)?;
        if next.consecutive() {
            Some(next)
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimerJob> {
        self.jobs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TimerJob> {
        self.jobs.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn show_seconds(&self) -> bool {
        self.show_seconds
    }

    pub fn set_show_seconds(&mut self, show_seconds: bool) {
        self.show_seconds = show_seconds;
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
