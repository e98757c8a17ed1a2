//! Domain errors.

use thiserror::Error;

/// Validation errors raised when constructing value objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error("display name must not be empty")]
    EmptyDisplayName,

    #[error("user id must not be empty")]
    EmptyUserId,

    #[error("invalid connection id: {0}")]
    InvalidConnectionId(String),
}
