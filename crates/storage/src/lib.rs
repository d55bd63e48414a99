// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fuse-storage: grouped key-value persistence for timer jobs
//!
//! A `ConfigStore` holds named groups of typed entries backed by a TOML
//! file, mirroring the `Jobs` / `JobN` layout of the original
//! configuration. Missing or malformed entries fall back to documented
//! defaults; loading never fails on bad data.

pub mod config;
pub mod jobs;

pub use config::{ConfigStore, StoreError};
pub use jobs::{load_job, load_registry, save_job, save_registry, JOBS_GROUP};
