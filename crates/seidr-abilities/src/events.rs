//! Event bus for notifying UI collaborators.
//!
//! Delivery is frame-synchronous: events published during a tick are
//! drained by observers within the same frame.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

/// Events emitted by the ability engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityEvent {
    /// An ability in this slot was activated (charge consumed).
    AbilityUsed {
        /// Equip slot index
        slot: usize,
    },
    /// An aim session started for this slot.
    TargetingStarted {
        /// Equip slot index
        slot: usize,
    },
    /// The aim session for this slot ended (confirmed or cancelled).
    TargetingEnded {
        /// Equip slot index
        slot: usize,
    },
}

/// Event bus for broadcasting ability events to subscribers.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<AbilityEvent>,
    /// Receiver for collecting events
    receiver: Receiver<AbilityEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: AbilityEvent) {
        // Non-blocking send - if full, event is dropped
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<AbilityEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<AbilityEvent> {
        self.sender.clone()
    }
}
