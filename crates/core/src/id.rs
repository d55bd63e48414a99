// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier types for jobs and tracked processes
//!
//! `JobId` doubles as the collaborator-facing back-reference: the
//! presentation layer keeps its own `JobId -> item` map instead of the
//! engine holding an opaque pointer at it.

use serde::{Deserialize, Serialize};

/// Unique identifier for a timer job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        JobId(uuid::Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        JobId(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        JobId(s.to_string())
    }
}

/// Identifier for one tracked spawn of a job's primary command.
///
/// Allocated per job; completion reports are keyed by `(JobId, ProcessId)`
/// rather than any ambient sender lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProcessId(pub u64);

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
