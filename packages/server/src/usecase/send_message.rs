//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者のプレゼンス確認と、送信者を含む全員へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 送信者の存在確認がこのレイヤーで行う唯一の検証である
//! - 未参加の送信者のメッセージは破棄され、何も配信されないことを保証する
//! - tempId がそのまま返り、クライアントが楽観的更新を置き換えられることを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信者本人を含む全員にメッセージが届く
//! - 正常系：room_id 省略時は共有 Room に送信される
//! - 異常系：未参加の送信者（破棄・カウント）

use std::sync::Arc;

use instalite_shared::time::Clock;

use crate::domain::{
    ChatMessage, ConnectionId, MessageContent, MessagePusher, PresenceRepository, RoomEvent,
    RoomId, TempId, Timestamp,
};

use super::{RelayStats, SendMessageError, broadcast_best_effort};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    stats: Arc<RelayStats>,
    /// room_id が省略された場合の送信先
    public_room: RoomId,
}

impl SendMessageUseCase {
    pub fn new(
        repository: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        stats: Arc<RelayStats>,
        public_room: RoomId,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
            stats,
            public_room,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - ブロードキャストしたメッセージ
    /// * `Err(SendMessageError::UnknownSender)` - 送信者が Room に参加していない（破棄）
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_id: Option<RoomId>,
        content: MessageContent,
        temp_id: Option<TempId>,
    ) -> Result<ChatMessage, SendMessageError> {
        let room_id = room_id.unwrap_or_else(|| self.public_room.clone());

        // 1. 送信者のプレゼンスを確認（唯一の検証）
        let Some(lookup) = self.repository.find_sender(&room_id, connection_id).await else {
            self.stats.record_dropped_message();
            tracing::warn!(
                "Dropping message from connection '{}': not a member of room '{}'",
                connection_id,
                room_id
            );
            return Err(SendMessageError::UnknownSender {
                connection_id: connection_id.to_string(),
                room_id: room_id.into_string(),
            });
        };

        // 2. サーバー時刻でメッセージを生成
        let message = ChatMessage::new(
            room_id,
            lookup.sender,
            content,
            Timestamp::new(self.clock.now_millis()),
            temp_id,
        );

        tracing::info!(
            "Relaying message from '{}' to room '{}' ({} connections)",
            message.sender.display_name,
            message.room_id,
            lookup.targets.len()
        );

        // 3. 送信者を含む全員にブロードキャスト
        broadcast_best_effort(
            self.message_pusher.as_ref(),
            lookup.targets,
            RoomEvent::MessagePosted {
                room: lookup.room,
                message: message.clone(),
            },
        )
        .await;

        Ok(message)
    }
}
