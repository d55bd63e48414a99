// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job and registry persistence
//!
//! Jobs live in numbered groups (`Job0`, `Job1`, ...) whose slot order is
//! the registry order; the `Jobs` group carries the count and the
//! "show seconds" display flag. While a job is Started its group also
//! carries `Expires`, the wall-clock unix timestamp at which the
//! countdown reaches zero, so an in-flight countdown survives a restart.

use crate::config::ConfigStore;
use fuse_core::job::DEFAULT_DELAY;
use fuse_core::{JobId, JobRegistry, JobSnapshot, JobState, TimerJob};

/// Group holding the job count and display preferences
pub const JOBS_GROUP: &str = "Jobs";

/// Write one job into the given group
pub fn save_job(store: &mut ConfigStore, group: &str, job: &TimerJob, unix_now: i64) {
    let snapshot = job.snapshot();

    store.set_int(group, "Delay", i64::from(snapshot.delay));
    store.set_str(group, "Command", snapshot.command);
    store.set_str(group, "OnSchedule", snapshot.on_schedule);
    store.set_str(group, "OnPause", snapshot.on_pause);
    store.set_str(group, "OnResume", snapshot.on_resume);
    store.set_str(group, "OnStop", snapshot.on_stop);
    store.set_str(group, "OnSuccess", snapshot.on_success);
    store.set_str(group, "OnFailure", snapshot.on_failure);
    store.set_bool(group, "Loop", snapshot.loop_enabled);
    store.set_bool(group, "OneInstance", snapshot.one_instance);
    store.set_bool(group, "Consecutive", snapshot.consecutive);
    store.set_int(group, "State", snapshot.state.ordinal());
    store.set_int(group, "Value", i64::from(snapshot.value));

    if snapshot.state == JobState::Started {
        store.set_int(group, "Expires", unix_now + i64::from(snapshot.value));
    } else {
        store.remove(group, "Expires");
    }
}

/// Read one job from the given group, defaulting every missing entry.
///
/// A Started job with a future `Expires` resumes with the remaining
/// seconds recomputed against `unix_now`; an already-expired timer keeps
/// its stale persisted value and does not auto-fire.
pub fn load_job(store: &ConfigStore, group: &str, unix_now: i64) -> TimerJob {
    let delay = read_seconds(store, group, "Delay").unwrap_or(DEFAULT_DELAY);
    let state = JobState::from_ordinal(store.get_int(group, "State").unwrap_or(0));
    let persisted_value = read_seconds(store, group, "Value").unwrap_or(delay);

    let value = if state == JobState::Started {
        match store.get_int(group, "Expires") {
            Some(expires) if expires > unix_now => {
                u32::try_from(expires - unix_now).unwrap_or(persisted_value)
            }
            _ => persisted_value,
        }
    } else {
        persisted_value
    };

    let snapshot = JobSnapshot {
        delay,
        value,
        state,
        command: read_string(store, group, "Command"),
        on_schedule: read_string(store, group, "OnSchedule"),
        on_pause: read_string(store, group, "OnPause"),
        on_resume: read_string(store, group, "OnResume"),
        on_stop: read_string(store, group, "OnStop"),
        on_success: read_string(store, group, "OnSuccess"),
        on_failure: read_string(store, group, "OnFailure"),
        loop_enabled: store.get_bool(group, "Loop").unwrap_or(false),
        one_instance: store.get_bool(group, "OneInstance").unwrap_or(true),
        consecutive: store.get_bool(group, "Consecutive").unwrap_or(false),
    };

    TimerJob::restore(JobId::generate(), snapshot)
}

/// Write the whole registry: count, display flag, and numbered groups.
///
/// Slots beyond the current count are not scrubbed; loading ignores them
/// because it only reads `Number` groups.
pub fn save_registry(store: &mut ConfigStore, registry: &JobRegistry, unix_now: i64) {
    store.set_int(JOBS_GROUP, "Number", registry.len() as i64);
    store.set_bool(JOBS_GROUP, "ShowSeconds", registry.show_seconds());

    for (n, job) in registry.iter().enumerate() {
        save_job(store, &format!("Job{}", n), job, unix_now);
    }
}

/// Rebuild a registry from the store
pub fn load_registry(store: &ConfigStore, unix_now: i64) -> JobRegistry {
    let mut registry = JobRegistry::new();
    registry.set_show_seconds(store.get_bool(JOBS_GROUP, "ShowSeconds").unwrap_or(false));

    let number = store.get_int(JOBS_GROUP, "Number").unwrap_or(0).max(0);
    for n in 0..number {
        registry.push(load_job(store, &format!("Job{}", n), unix_now));
    }
    registry
}

fn read_string(store: &ConfigStore, group: &str, key: &str) -> String {
    store.get_str(group, key).unwrap_or_default().to_string()
}

fn read_seconds(store: &ConfigStore, group: &str, key: &str) -> Option<u32> {
    let raw = store.get_int(group, key)?;
    u32::try_from(raw).ok()
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
