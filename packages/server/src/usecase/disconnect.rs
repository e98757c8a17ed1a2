//! UseCase: 接続の切断
//!
//! 切断された接続を参加中の全 Room から退出させ、送信チャンネルを登録解除します。
//! 再接続時の Room 再参加はクライアントの責務です（サーバーはセッションを復元しません）。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PresenceRepository, RoomId};

use super::{LeaveRoomUseCase, RelayStats};

/// 接続切断のユースケース
pub struct DisconnectUseCase {
    repository: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    leave_room: Arc<LeaveRoomUseCase>,
    stats: Arc<RelayStats>,
}

impl DisconnectUseCase {
    pub fn new(
        repository: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        leave_room: Arc<LeaveRoomUseCase>,
        stats: Arc<RelayStats>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            leave_room,
            stats,
        }
    }

    /// 切断を実行し、退出した Room の ID を返す
    pub async fn execute(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        let mut left = Vec::new();
        for room_id in self.repository.rooms_of(connection_id).await {
            if self
                .leave_room
                .execute(connection_id, &room_id)
                .await
                .is_some()
            {
                left.push(room_id);
            }
        }

        self.message_pusher.unregister_client(connection_id).await;
        self.stats.connection_closed();

        tracing::info!(
            "Connection '{}' disconnected (left {} rooms)",
            connection_id,
            left.len()
        );
        left
    }
}
