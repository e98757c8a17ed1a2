//! UseCase: Room からの退出
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute()
//! - 退出通知と参加者リストが残りの参加者に届くこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：3 人中 1 人が退出
//! - エッジケース：未参加の接続・存在しない Room からの退出（何もしない）

use std::sync::Arc;

use crate::domain::{ConnectionId, Member, MessagePusher, PresenceRepository, RoomEvent, RoomId};

use super::broadcast_best_effort;

/// Room 退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveRoomUseCase {
    pub fn new(
        repository: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// Remove the connection from the room and notify the remaining members.
    ///
    /// Returns the departed member, or `None` when the connection was not in
    /// the room (no-op).
    pub async fn execute(&self, connection_id: &ConnectionId, room_id: &RoomId) -> Option<Member> {
        let Some(outcome) = self.repository.leave(room_id, connection_id).await else {
            tracing::debug!(
                "Connection '{}' is not in room '{}', nothing to leave",
                connection_id,
                room_id
            );
            return None;
        };

        tracing::info!(
            "'{}' left room '{}' ({} connections remain)",
            outcome.member.display_name,
            outcome.room.id,
            outcome.targets.len()
        );

        broadcast_best_effort(
            self.message_pusher.as_ref(),
            outcome.targets.clone(),
            RoomEvent::MemberLeft {
                room: outcome.room.clone(),
                member: outcome.member.clone(),
            },
        )
        .await;
        broadcast_best_effort(
            self.message_pusher.as_ref(),
            outcome.targets,
            RoomEvent::Roster {
                room: outcome.room,
                members: outcome.roster,
            },
        )
        .await;

        Some(outcome.member)
    }
}
