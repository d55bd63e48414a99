// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fuse execution engine
//!
//! Owns the tick scheduler, the process adapter, and the event bus, and
//! executes the effects produced by the `TimerJob` state machines. All
//! job mutation happens on the task that owns the [`Engine`]; process
//! completions arrive on an internal channel keyed by job and handle.

mod error;
mod runtime;
mod scheduler;
mod spawn;

pub use error::EngineError;
pub use runtime::Engine;
pub use scheduler::{TickScheduler, TICK_INTERVAL};
pub use spawn::{ProcessAdapter, ProcessEvent, ProcessEventSender, ProcessOutcome, ShellAdapter};

#[cfg(any(test, feature = "test-support"))]
pub use spawn::fake::FakeProcessAdapter;
