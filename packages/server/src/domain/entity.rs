//! Domain entities: rooms, their members and chat messages.

use std::collections::{BTreeSet, HashMap};

use super::value_object::{
    ConnectionId, DisplayName, MessageContent, RoomId, TempId, Timestamp, UserId,
};

/// Identity under which a connection appears in a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub display_name: DisplayName,
    pub user_id: Option<UserId>,
}

impl Member {
    pub fn new(display_name: DisplayName, user_id: Option<UserId>) -> Self {
        Self {
            display_name,
            user_id,
        }
    }

    /// Member known only by display name (legacy `join`).
    pub fn anonymous(display_name: DisplayName) -> Self {
        Self::new(display_name, None)
    }
}

/// Which wire dialect a room speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomKind {
    /// The legacy shared room joined through the `join` event.
    Public,
    /// Any room joined through `joinRoom`.
    Chat,
}

impl RoomKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomKind::Public => "public",
            RoomKind::Chat => "chat",
        }
    }
}

/// A chat room and its presence map.
///
/// Rooms are created lazily on first join and are never removed, even when
/// their last member leaves.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub kind: RoomKind,
    pub created_at: Timestamp,
    members: HashMap<ConnectionId, Member>,
}

impl Room {
    pub fn new(id: RoomId, kind: RoomKind, created_at: Timestamp) -> Self {
        Self {
            id,
            kind,
            created_at,
            members: HashMap::new(),
        }
    }

    /// Add a connection to the room.
    ///
    /// Returns `false` when the connection is already a member; the existing
    /// entry (and its display name) is kept untouched in that case.
    pub fn add_member(&mut self, connection_id: ConnectionId, member: Member) -> bool {
        if self.members.contains_key(&connection_id) {
            return false;
        }
        self.members.insert(connection_id, member);
        true
    }

    /// Remove a connection, returning the member it was attached to.
    pub fn remove_member(&mut self, connection_id: &ConnectionId) -> Option<Member> {
        self.members.remove(connection_id)
    }

    pub fn member(&self, connection_id: &ConnectionId) -> Option<&Member> {
        self.members.get(connection_id)
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains_key(connection_id)
    }

    /// All connections currently in the room (broadcast targets).
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.members.keys().cloned().collect()
    }

    /// Unique display names of the current members, sorted.
    pub fn roster(&self) -> Vec<DisplayName> {
        self.members
            .values()
            .map(|member| member.display_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A message as relayed to room members. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub room_id: RoomId,
    pub sender: Member,
    pub content: MessageContent,
    pub timestamp: Timestamp,
    pub temp_id: Option<TempId>,
}

impl ChatMessage {
    pub fn new(
        room_id: RoomId,
        sender: Member,
        content: MessageContent,
        timestamp: Timestamp,
        temp_id: Option<TempId>,
    ) -> Self {
        Self {
            room_id,
            sender,
            content,
            timestamp,
            temp_id,
        }
    }
}
