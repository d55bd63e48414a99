// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fuse-core: Core library for the fuse countdown job engine
//!
//! This crate provides:
//! - The pure `TimerJob` state machine and its effect vocabulary
//! - The ordered `JobRegistry` with consecutive-chaining lookup
//! - Typed job events and the subscriber bus
//! - Clock abstraction and time formatting helpers

pub mod bus;
pub mod clock;
pub mod id;
pub mod timefmt;

// State machines (order matters for dependencies)
pub mod effect;
pub mod event;
pub mod job;
pub mod registry;

// Re-exports
pub use bus::{EventBus, EventReceiver, EventSender};
pub use clock::{Clock, FakeClock, SystemClock};
pub use effect::Effect;
pub use event::{Field, JobEvent};
pub use id::{JobId, ProcessId};
pub use job::{JobSnapshot, JobState, TimerJob};
pub use registry::JobRegistry;
