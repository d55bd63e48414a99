// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine runtime

use fuse_core::JobId;
use thiserror::Error;

/// Errors that can occur in the engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("job not found: {0}")]
    JobNotFound(JobId),
    #[error("store error: {0}")]
    Store(#[from] fuse_storage::StoreError),
}
