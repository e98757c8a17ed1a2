//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the identity given in the connect query
    #[error("Server rejected the connection: {0}")]
    Rejected(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to reconnect after {0} attempts")]
    ReconnectFailed(u32),
}

/// Errors while parsing a line typed by the user
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("/{0} needs a room id")]
    MissingArgument(&'static str),

    #[error("unknown command '/{0}' (try /join, /leave, /switch, /rooms, /quit)")]
    UnknownCommand(String),
}
