//! Conversion logic between domain models and DTOs.

use instalite_shared::time::timestamp_to_iso8601;

use crate::domain::{ChatMessage, Member, Room, RoomEvent, RoomKind, RoomRef};
use crate::infrastructure::dto::{http, websocket as dto};
use crate::usecase::RelayStatsSnapshot;

// ========================================
// Domain Event → WebSocket DTO
// ========================================

impl From<&RoomEvent> for dto::ServerEvent {
    fn from(event: &RoomEvent) -> Self {
        match event.room().kind {
            RoomKind::Public => dto::ServerEvent::Public(public_event(event)),
            RoomKind::Chat => dto::ServerEvent::Chat(chat_event(event)),
        }
    }
}

fn public_event(event: &RoomEvent) -> dto::PublicRoomEvent {
    match event {
        RoomEvent::MemberJoined { member, .. } => {
            dto::PublicRoomEvent::UserJoined(member.display_name.to_string())
        }
        RoomEvent::MemberLeft { member, .. } => {
            dto::PublicRoomEvent::UserLeft(member.display_name.to_string())
        }
        RoomEvent::Roster { members, .. } => {
            dto::PublicRoomEvent::UserList(members.iter().map(|n| n.to_string()).collect())
        }
        RoomEvent::MessagePosted { message, .. } => {
            dto::PublicRoomEvent::ReceiveMessage(dto::PublicMessageDto {
                sender: message.sender.display_name.to_string(),
                content: message.content.as_str().to_string(),
                timestamp: timestamp_to_iso8601(message.timestamp.value()),
                temp_id: message.temp_id.as_ref().map(|t| t.as_str().to_string()),
            })
        }
        RoomEvent::JoinAcknowledged { room } => dto::PublicRoomEvent::JoinedRoom(joined(room)),
    }
}

fn chat_event(event: &RoomEvent) -> dto::ChatRoomEvent {
    match event {
        RoomEvent::MemberJoined { room, member } => {
            dto::ChatRoomEvent::UserJoinedChat(chat_member(room, member))
        }
        RoomEvent::MemberLeft { room, member } => {
            dto::ChatRoomEvent::UserLeftChat(chat_member(room, member))
        }
        RoomEvent::Roster { room, members } => dto::ChatRoomEvent::UserList(dto::RosterDto {
            room_id: room.id.to_string(),
            users: members.iter().map(|n| n.to_string()).collect(),
        }),
        RoomEvent::MessagePosted { message, .. } => {
            dto::ChatRoomEvent::ReceiveMessage(chat_message(message))
        }
        RoomEvent::JoinAcknowledged { room } => dto::ChatRoomEvent::JoinedRoom(joined(room)),
    }
}

fn chat_member(room: &RoomRef, member: &Member) -> dto::ChatMemberDto {
    dto::ChatMemberDto {
        username: member.display_name.to_string(),
        user_id: member.user_id.as_ref().map(|u| u.as_str().to_string()),
        room_id: room.id.to_string(),
    }
}

fn chat_message(message: &ChatMessage) -> dto::ChatMessageDto {
    dto::ChatMessageDto {
        sender: message.sender.display_name.to_string(),
        sender_id: message.sender.user_id.as_ref().map(|u| u.as_str().to_string()),
        room_id: message.room_id.to_string(),
        content: message.content.as_str().to_string(),
        timestamp: timestamp_to_iso8601(message.timestamp.value()),
        temp_id: message.temp_id.as_ref().map(|t| t.as_str().to_string()),
    }
}

fn joined(room: &RoomRef) -> dto::JoinedRoomDto {
    dto::JoinedRoomDto {
        room_id: room.id.to_string(),
    }
}

/// Encode a domain event as a WebSocket text frame.
pub fn encode_event(event: &RoomEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&dto::ServerEvent::from(event))
}

// ========================================
// Domain Model → HTTP DTO
// ========================================

impl From<&Room> for http::RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id.to_string(),
            kind: room.kind.as_str().to_string(),
            members: room.roster().into_iter().map(|n| n.into_string()).collect(),
            created_at: timestamp_to_iso8601(room.created_at.value()),
        }
    }
}

impl From<RelayStatsSnapshot> for http::RelayStatsDto {
    fn from(snapshot: RelayStatsSnapshot) -> Self {
        Self {
            dropped_messages: snapshot.dropped_messages,
            rejected_events: snapshot.rejected_events,
            active_connections: snapshot.active_connections,
        }
    }
}
