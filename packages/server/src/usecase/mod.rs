//! UseCase layer: one use case per presence/relay operation.

mod connect;
mod disconnect;
mod error;
mod get_rooms;
mod join_room;
mod leave_room;
mod list_members;
mod send_message;
pub mod stats;

#[cfg(test)]
pub(crate) mod test_support;

pub use connect::ConnectUseCase;
pub use disconnect::DisconnectUseCase;
pub use error::{GetRoomDetailError, JoinRoomError, ListMembersError, SendMessageError};
pub use get_rooms::{GetRoomDetailUseCase, GetRoomsUseCase};
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use list_members::ListMembersUseCase;
pub use send_message::SendMessageUseCase;
pub use stats::{RelayStats, RelayStatsSnapshot};

use crate::domain::{ConnectionId, MessagePusher, RoomEvent};

/// Fan an event out to `targets`, logging instead of failing.
async fn broadcast_best_effort(
    message_pusher: &dyn MessagePusher,
    targets: Vec<ConnectionId>,
    event: RoomEvent,
) {
    let room_id = event.room().id.clone();
    if let Err(e) = message_pusher.broadcast(targets, &event).await {
        tracing::warn!(
            "Failed to broadcast {} to room '{}': {}",
            event.name(),
            room_id,
            e
        );
    }
}

/// Push an event to a single connection, logging instead of failing.
async fn push_best_effort(
    message_pusher: &dyn MessagePusher,
    connection_id: &ConnectionId,
    event: RoomEvent,
) {
    if let Err(e) = message_pusher.push_to(connection_id, &event).await {
        tracing::warn!(
            "Failed to push {} to connection '{}': {}",
            event.name(),
            connection_id,
            e
        );
    }
}
