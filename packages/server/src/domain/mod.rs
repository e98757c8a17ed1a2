//! Domain layer: presence model of chat rooms.
//!
//! ドメイン層は他の層に依存しません。Repository と MessagePusher の trait は
//! ここで定義し、具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

pub mod entity;
pub mod error;
pub mod event;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, Member, Room, RoomKind};
pub use error::ValueObjectError;
pub use event::{RoomEvent, RoomRef};
pub use message_pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use repository::{JoinOutcome, LeaveOutcome, PresenceRepository, SenderLookup};
pub use value_object::{
    ConnectionId, DisplayName, MessageContent, RoomId, TempId, Timestamp, UserId,
};
