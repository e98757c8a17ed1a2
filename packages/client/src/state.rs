//! Client-side view of joined rooms and unconfirmed messages.

use std::collections::HashMap;

use uuid::Uuid;

/// Rooms this client has joined and the messages still waiting for their echo.
///
/// Survives reconnects: after a new session is opened every room in
/// `joined_rooms` is joined again.
#[derive(Debug, Default)]
pub struct ClientState {
    joined_rooms: Vec<String>,
    active_room: Option<String>,
    /// temp id → content
    pending: HashMap<String, String>,
}

impl ClientState {
    pub fn new(rooms: Vec<String>) -> Self {
        let mut state = Self::default();
        for room in rooms {
            state.remember_room(&room);
        }
        state
    }

    pub fn joined_rooms(&self) -> &[String] {
        &self.joined_rooms
    }

    pub fn active_room(&self) -> Option<&str> {
        self.active_room.as_deref()
    }

    /// Record a joined room; the first one becomes active.
    pub fn remember_room(&mut self, room: &str) {
        if !self.joined_rooms.iter().any(|r| r == room) {
            self.joined_rooms.push(room.to_string());
        }
        if self.active_room.is_none() {
            self.active_room = Some(room.to_string());
        }
    }

    /// Forget a left room. If it was active, the oldest remaining room takes over.
    pub fn forget_room(&mut self, room: &str) {
        self.joined_rooms.retain(|r| r != room);
        if self.active_room.as_deref() == Some(room) {
            self.active_room = self.joined_rooms.first().cloned();
        }
    }

    /// Make `room` active. Returns `false` if it has not been joined.
    pub fn switch_to(&mut self, room: &str) -> bool {
        if !self.joined_rooms.iter().any(|r| r == room) {
            return false;
        }
        self.active_room = Some(room.to_string());
        true
    }

    /// Register a message shown optimistically and return its temp id.
    pub fn add_pending(&mut self, content: String) -> String {
        let temp_id = Uuid::new_v4().to_string();
        self.pending.insert(temp_id.clone(), content);
        temp_id
    }

    /// Reconcile an echoed message; returns the pending content if it was ours.
    pub fn confirm(&mut self, temp_id: &str) -> Option<String> {
        self.pending.remove(temp_id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Forget unconfirmed messages from the previous connection.
    ///
    /// Echoes never arrive for messages the server dropped or that were lost
    /// with the old socket. Returns how many were discarded.
    pub fn begin_session(&mut self) -> usize {
        let discarded = self.pending.len();
        self.pending.clear();
        discarded
    }
}
