//! UseCase: Room への参加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::join_public() / join_room()
//! - 参加通知・参加者リスト・参加完了通知のブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加（参加者本人を含む全員に通知）
//! - エッジケース：同じ接続による再参加（エントリは一つのまま、再通知なし）
//! - 異常系：identity を持たない接続の `joinRoom`

use std::sync::Arc;

use instalite_shared::time::Clock;

use crate::domain::{
    ConnectionId, JoinOutcome, Member, MessagePusher, PresenceRepository, RoomEvent, RoomId,
    RoomKind, Timestamp,
};

use super::{JoinRoomError, RelayStats, broadcast_best_effort, push_best_effort};

/// Room 参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn PresenceRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    stats: Arc<RelayStats>,
    /// `join` イベントで参加する共有 Room
    public_room: RoomId,
}

impl JoinRoomUseCase {
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

    pub fn public_room(&self) -> &RoomId {
        &self.public_room
    }

    pub fn kind_of(&self, room_id: &RoomId) -> RoomKind {
        if room_id == &self.public_room {
            RoomKind::Public
        } else {
            RoomKind::Chat
        }
    }

    /// Legacy `join`: enter the public room under the given display name.
    pub async fn join_public(&self, connection_id: &ConnectionId, member: Member) -> JoinOutcome {
        self.apply(connection_id, self.public_room.clone(), member)
            .await
    }

    /// Multi-room `joinRoom`: enter `room_id` with the connection's identity.
    pub async fn join_room(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        identity: Option<Member>,
    ) -> Result<JoinOutcome, JoinRoomError> {
        let Some(member) = identity else {
            self.stats.record_rejected_event();
            tracing::warn!(
                "Connection '{}' tried to join room '{}' without an identity",
                connection_id,
                room_id
            );
            return Err(JoinRoomError::MissingIdentity {
                room_id: room_id.into_string(),
            });
        };

        Ok(self.apply(connection_id, room_id, member).await)
    }

    async fn apply(
        &self,
        connection_id: &ConnectionId,
        room_id: RoomId,
        member: Member,
    ) -> JoinOutcome {
        let kind = self.kind_of(&room_id);
        let now = Timestamp::new(self.clock.now_millis());

        // 1. プレゼンスマップに追加（Room が無ければ作成）
        let outcome = self
            .repository
            .join(room_id, kind, connection_id.clone(), member, now)
            .await;

        let roster = RoomEvent::Roster {
            room: outcome.room.clone(),
            members: outcome.roster.clone(),
        };

        if outcome.newly_joined {
            tracing::info!(
                "'{}' joined room '{}' ({} connections)",
                outcome.member.display_name,
                outcome.room.id,
                outcome.targets.len()
            );

            // 2. 参加者本人を含む全員に参加通知と参加者リストを送信
            broadcast_best_effort(
                self.message_pusher.as_ref(),
                outcome.targets.clone(),
                RoomEvent::MemberJoined {
                    room: outcome.room.clone(),
                    member: outcome.member.clone(),
                },
            )
            .await;
            broadcast_best_effort(
                self.message_pusher.as_ref(),
                outcome.targets.clone(),
                roster,
            )
            .await;
        } else {
            // 再参加: マップは変更しない。本人にだけ参加者リストを返す
            tracing::debug!(
                "Connection '{}' is already in room '{}'",
                connection_id,
                outcome.room.id
            );
            push_best_effort(self.message_pusher.as_ref(), connection_id, roster).await;
        }

        // 3. 参加完了通知
        push_best_effort(
            self.message_pusher.as_ref(),
            connection_id,
            RoomEvent::JoinAcknowledged {
                room: outcome.room.clone(),
            },
        )
        .await;

        outcome
    }
}
