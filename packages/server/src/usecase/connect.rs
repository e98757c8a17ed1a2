//! UseCase: 接続の登録

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

use super::RelayStats;

/// 接続登録のユースケース
///
/// 接続 ID を発行し、送信チャンネルを MessagePusher に登録します。
/// Room への参加は別イベント（`join` / `joinRoom`）で行われます。
pub struct ConnectUseCase {
    message_pusher: Arc<dyn MessagePusher>,
    stats: Arc<RelayStats>,
}

impl ConnectUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, stats: Arc<RelayStats>) -> Self {
        Self {
            message_pusher,
            stats,
        }
    }

    /// 接続を登録し、発行した ConnectionId を返す
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;
        self.stats.connection_opened();
        tracing::debug!("Connection '{}' registered", connection_id);
        connection_id
    }
}
