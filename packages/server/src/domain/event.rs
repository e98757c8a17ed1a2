//! Domain events fanned out to room members.

use super::{
    entity::{ChatMessage, Member, RoomKind},
    value_object::{DisplayName, RoomId},
};

/// Room an event belongs to, with the kind that selects its wire dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomRef {
    pub id: RoomId,
    pub kind: RoomKind,
}

impl RoomRef {
    pub fn new(id: RoomId, kind: RoomKind) -> Self {
        Self { id, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    /// A connection joined the room.
    MemberJoined { room: RoomRef, member: Member },
    /// A connection left the room (explicitly or by disconnecting).
    MemberLeft { room: RoomRef, member: Member },
    /// Refreshed list of display names.
    Roster {
        room: RoomRef,
        members: Vec<DisplayName>,
    },
    /// A chat message relayed to every member, sender included.
    MessagePosted { room: RoomRef, message: ChatMessage },
    /// Sent to the joiner once its join has been applied.
    JoinAcknowledged { room: RoomRef },
}

impl RoomEvent {
    pub fn room(&self) -> &RoomRef {
        match self {
            RoomEvent::MemberJoined { room, .. }
            | RoomEvent::MemberLeft { room, .. }
            | RoomEvent::Roster { room, .. }
            | RoomEvent::MessagePosted { room, .. }
            | RoomEvent::JoinAcknowledged { room } => room,
        }
    }

    /// Short event name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            RoomEvent::MemberJoined { .. } => "member-joined",
            RoomEvent::MemberLeft { .. } => "member-left",
            RoomEvent::Roster { .. } => "roster",
            RoomEvent::MessagePosted { .. } => "message-posted",
            RoomEvent::JoinAcknowledged { .. } => "join-acknowledged",
        }
    }
}
