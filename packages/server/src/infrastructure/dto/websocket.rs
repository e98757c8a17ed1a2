//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.
//! Outbound events come in two dialects: the public room keeps the legacy
//! kebab-case names with bare payloads, chat rooms use camelCase names with
//! payloads that carry the room id.

use serde::{Deserialize, Serialize};

// ========================================
// Inbound (client → server)
// ========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Join the public room under the given display name.
    #[serde(rename = "join")]
    Join(String),
    /// Join a chat room using the identity given at connect time.
    #[serde(rename = "joinRoom")]
    JoinRoom(String),
    #[serde(rename = "leaveRoom")]
    LeaveRoom(String),
    #[serde(rename = "sendMessage")]
    SendMessage(SendMessagePayload),
    /// Legacy spelling of `sendMessage`.
    #[serde(rename = "send-message")]
    LegacySendMessage(SendMessagePayload),
}

/// Payload of `sendMessage`: either a structured message or bare content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SendMessagePayload {
    Text(String),
    Message(OutgoingMessage),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    #[serde(default, alias = "roomId", skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    pub content: String,
    #[serde(
        default,
        rename = "tempId",
        alias = "temp_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub temp_id: Option<String>,
}

impl SendMessagePayload {
    /// Split into `(room_id, content, temp_id)`.
    pub fn into_parts(self) -> (Option<String>, String, Option<String>) {
        match self {
            SendMessagePayload::Text(content) => (None, content, None),
            SendMessagePayload::Message(message) => {
                (message.room_id, message.content, message.temp_id)
            }
        }
    }
}

// ========================================
// Outbound (server → client)
// ========================================

/// Events of the public room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum PublicRoomEvent {
    #[serde(rename = "user-joined")]
    UserJoined(String),
    #[serde(rename = "user-left")]
    UserLeft(String),
    #[serde(rename = "user-list")]
    UserList(Vec<String>),
    #[serde(rename = "receive-message")]
    ReceiveMessage(PublicMessageDto),
    #[serde(rename = "joinedRoom")]
    JoinedRoom(JoinedRoomDto),
}

/// Events of chat rooms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ChatRoomEvent {
    #[serde(rename = "userJoinedChat")]
    UserJoinedChat(ChatMemberDto),
    #[serde(rename = "userLeftChat")]
    UserLeftChat(ChatMemberDto),
    #[serde(rename = "user-list")]
    UserList(RosterDto),
    #[serde(rename = "receiveMessage")]
    ReceiveMessage(ChatMessageDto),
    #[serde(rename = "joinedRoom")]
    JoinedRoom(JoinedRoomDto),
}

/// Any outbound frame.
///
/// `joinedRoom` has the same shape in both dialects and always parses as
/// the public variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerEvent {
    Public(PublicRoomEvent),
    Chat(ChatRoomEvent),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicMessageDto {
    pub sender: String,
    pub content: String,
    /// ISO 8601 (UTC, milliseconds)
    pub timestamp: String,
    #[serde(default, rename = "tempId", skip_serializing_if = "Option::is_none")]
    pub temp_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageDto {
    pub sender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    pub room_id: String,
    pub content: String,
    /// ISO 8601 (UTC, milliseconds)
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMemberDto {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub room_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterDto {
    pub room_id: String,
    pub users: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedRoomDto {
    pub room_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_legacy_join() {
        // テスト項目: join イベントは表示名の文字列を data に持つ
        // given (前提条件):
        let json = r#"{"event":"join","data":"alice"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(event, ClientEvent::Join("alice".to_string()));
    }

    #[test]
    fn test_send_message_accepts_both_room_id_spellings_and_temp_id() {
        // テスト項目: sendMessage は room_id / roomId のどちらでも受け付け、tempId を保持する
        // given (前提条件):
        let snake = r#"{"event":"sendMessage","data":{"room_id":"chat-1","content":"hi","tempId":"t-1"}}"#;
        let camel = r#"{"event":"sendMessage","data":{"roomId":"chat-1","content":"hi","tempId":"t-1"}}"#;

        // when (操作):
        let snake_event: ClientEvent = serde_json::from_str(snake).unwrap();
        let camel_event: ClientEvent = serde_json::from_str(camel).unwrap();

        // then (期待する結果):
        let expected = ClientEvent::SendMessage(SendMessagePayload::Message(OutgoingMessage {
            room_id: Some("chat-1".to_string()),
            content: "hi".to_string(),
            temp_id: Some("t-1".to_string()),
        }));
        assert_eq!(snake_event, expected);
        assert_eq!(camel_event, expected);
    }

    #[test]
    fn test_legacy_send_message_with_bare_text() {
        // テスト項目: send-message は文字列だけの data を受け付け、room id は None になる
        // given (前提条件):
        let json = r#"{"event":"send-message","data":"hello"}"#;

        // when (操作):
        let event: ClientEvent = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        let ClientEvent::LegacySendMessage(payload) = event else {
            panic!("unexpected event: {:?}", event);
        };
        assert_eq!(payload.into_parts(), (None, "hello".to_string(), None));
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        // テスト項目: 未知のイベント名はデコードエラーになる
        // given (前提条件):
        let json = r#"{"event":"typing","data":"chat-1"}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientEvent>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_chat_message_serializes_camel_case_and_omits_missing_optionals() {
        // テスト項目: receiveMessage は camelCase で、None のフィールドは出力しない
        // given (前提条件):
        let event = ChatRoomEvent::ReceiveMessage(ChatMessageDto {
            sender: "alice".to_string(),
            sender_id: None,
            room_id: "chat-1".to_string(),
            content: "hi".to_string(),
            timestamp: "2023-01-01T00:00:00.000Z".to_string(),
            temp_id: Some("t-1".to_string()),
        });

        // when (操作):
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({
                "event": "receiveMessage",
                "data": {
                    "sender": "alice",
                    "roomId": "chat-1",
                    "content": "hi",
                    "timestamp": "2023-01-01T00:00:00.000Z",
                    "tempId": "t-1"
                }
            })
        );
    }

    #[test]
    fn test_server_event_distinguishes_user_list_dialects() {
        // テスト項目: user-list は data の形（配列 / オブジェクト）で方言が判別される
        // given (前提条件):
        let public = r#"{"event":"user-list","data":["alice","bob"]}"#;
        let chat = r#"{"event":"user-list","data":{"roomId":"chat-1","users":["alice"]}}"#;

        // when (操作):
        let public_event: ServerEvent = serde_json::from_str(public).unwrap();
        let chat_event: ServerEvent = serde_json::from_str(chat).unwrap();

        // then (期待する結果):
        assert_eq!(
            public_event,
            ServerEvent::Public(PublicRoomEvent::UserList(vec![
                "alice".to_string(),
                "bob".to_string()
            ]))
        );
        assert_eq!(
            chat_event,
            ServerEvent::Chat(ChatRoomEvent::UserList(RosterDto {
                room_id: "chat-1".to_string(),
                users: vec!["alice".to_string()],
            }))
        );
    }
}
