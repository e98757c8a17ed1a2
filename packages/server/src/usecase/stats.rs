//! Relay statistics.
//!
//! Drops and rejections never reach the client; these counters make them
//! observable through `/api/stats` and in tests.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RelayStats {
    dropped_messages: AtomicU64,
    rejected_events: AtomicU64,
    active_connections: AtomicU64,
}

/// Point-in-time copy of [`RelayStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelayStatsSnapshot {
    pub dropped_messages: u64,
    pub rejected_events: u64,
    pub active_connections: u64,
}

impl RelayStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// A message was dropped because its sender was not in the room.
    pub fn record_dropped_message(&self) {
        self.dropped_messages.fetch_add(1, Ordering::Relaxed);
    }

    /// An inbound frame was malformed or failed validation.
    pub fn record_rejected_event(&self) {
        self.rejected_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_opened(&self) {
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        // saturating: a close without a matching open must not wrap
        let _ = self.active_connections.fetch_update(
            Ordering::Relaxed,
            Ordering::Relaxed,
            |current| Some(current.saturating_sub(1)),
        );
    }

    pub fn snapshot(&self) -> RelayStatsSnapshot {
        RelayStatsSnapshot {
            dropped_messages: self.dropped_messages.load(Ordering::Relaxed),
            rejected_events: self.rejected_events.load(Ordering::Relaxed),
            active_connections: self.active_connections.load(Ordering::Relaxed),
        }
    }
}
