//! UseCase layer errors.

use thiserror::Error;

use crate::domain::ValueObjectError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    /// `joinRoom` needs the caller's identity from the connect query.
    #[error("connection has no identity to join room '{room_id}' with")]
    MissingIdentity { room_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    /// The sender has no presence entry in the target room; the message is dropped.
    #[error("connection '{connection_id}' is not a member of room '{room_id}'")]
    UnknownSender {
        connection_id: String,
        room_id: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListMembersError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("invalid room id: {0}")]
    InvalidRoomId(#[from] ValueObjectError),

    #[error("room '{0}' not found")]
    RoomNotFound(String),
}
