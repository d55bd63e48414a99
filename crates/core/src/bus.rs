// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus for delivering job events to subscribers

use crate::event::JobEvent;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

/// Sender for event delivery
pub type EventSender = mpsc::UnboundedSender<JobEvent>;
/// Receiver for event delivery
pub type EventReceiver = mpsc::UnboundedReceiver<JobEvent>;

/// Fans job events out to every live subscriber
pub struct EventBus {
    subscribers: Arc<RwLock<Vec<EventSender>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Subscribe to all job events
    pub fn subscribe(&self) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subs.push(tx);
        rx
    }

    /// Publish an event to all subscribers, pruning closed ones
    pub fn publish(&self, event: JobEvent) {
        tracing::trace!(event = event.name(), job = %event.job(), "publish");
        let mut subs = self.subscribers.write().unwrap_or_else(|e| e.into_inner());
        subs.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Get count of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
