// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tick scheduling for running countdowns
//!
//! One repeating one-second tick per Started job, active only while the
//! job stays Started; leaving that state cancels the source. Each heap
//! item carries the generation it was scheduled under, so a cancel
//! followed by a fresh schedule never revives the old source.

use fuse_core::JobId;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

/// Countdown granularity
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// A scheduled tick for one job
#[derive(Debug, Clone)]
struct TickItem {
    job: JobId,
    generation: u64,
    fire_at: Instant,
}

impl PartialEq for TickItem {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at
            && self.job == other.job
            && self.generation == other.generation
    }
}

impl Eq for TickItem {}

impl PartialOrd for TickItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TickItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Min-heap: earliest first, job id and generation as tiebreakers
        Reverse(self.fire_at)
            .cmp(&Reverse(other.fire_at))
            .then_with(|| self.job.0.cmp(&other.job.0))
            .then_with(|| self.generation.cmp(&other.generation))
    }
}

/// Manages the repeating per-job tick sources
#[derive(Default)]
pub struct TickScheduler {
    items: BinaryHeap<TickItem>,
    /// Current generation per job; bumped on every schedule and cancel,
    /// invalidating all older heap items for that job
    generations: HashMap<JobId, u64>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a repeating tick for a job; the first tick fires one
    /// interval from `now`. Any previous source for the job is dead
    /// from this point on.
    pub fn schedule(&mut self, job: JobId, now: Instant) {
        let generation = self.bump(&job);
        self.items.push(TickItem {
            job,
            generation,
            fire_at: now + TICK_INTERVAL,
        });
    }

    /// Cancel a job's tick source
    pub fn cancel(&mut self, job: &JobId) {
        self.bump(job);
    }

    /// Jobs whose tick is due at or before `now`, re-armed for the next
    /// interval. A job appears once per elapsed interval.
    pub fn poll(&mut self, now: Instant) -> Vec<JobId> {
        let mut due = Vec::new();

        while let Some(item) = self.items.peek() {
            if item.fire_at > now {
                break;
            }

            let Some(item) = self.items.pop() else {
                break;
            };

            // Drop items from superseded generations
            if self.generations.get(&item.job) != Some(&item.generation) {
                continue;
            }

            self.items.push(TickItem {
                job: item.job.clone(),
                generation: item.generation,
                fire_at: item.fire_at + TICK_INTERVAL,
            });
            due.push(item.job);
        }

        due
    }

    /// The next tick deadline, if any source is armed. May name a stale
    /// item's deadline; the resulting poll just discards it.
    pub fn next_fire_time(&self) -> Option<Instant> {
        self.items.peek().map(|item| item.fire_at)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn bump(&mut self, job: &JobId) -> u64 {
        let generation = self.generations.entry(job.clone()).or_insert(0);
        *generation += 1;
        *generation
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
