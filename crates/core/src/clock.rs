// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling
//!
//! Ticks run off monotonic `Instant`s; persistence needs wall-clock unix
//! timestamps for the `Expires` entry. Both come from the same clock so
//! tests can steer them together.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A clock that provides monotonic and wall-clock time
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> Instant;

    /// Current wall-clock time as seconds since the unix epoch
    fn now_unix(&self) -> i64;
}

/// Real system clock
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn now_unix(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Fake clock for testing with controllable time
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<(Instant, i64)>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new((Instant::now(), 0))),
        }
    }

    /// Advance both the monotonic and wall-clock time by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.0 += duration;
        current.1 += duration.as_secs() as i64;
    }

    /// Set the wall-clock time to a specific unix timestamp
    pub fn set_unix(&self, unix: i64) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.1 = unix;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.current.lock().unwrap_or_else(|e| e.into_inner()).0
    }

    fn now_unix(&self) -> i64 {
        self.current.lock().unwrap_or_else(|e| e.into_inner()).1
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
