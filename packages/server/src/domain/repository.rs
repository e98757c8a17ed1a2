//! Repository trait 定義
//!
//! プレゼンスマップ（room id → connection id → member）へのアクセスを抽象化します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 各メソッドは「マップの更新」と「ブロードキャストに必要なスナップショットの取得」を
//! 一度のロック取得の中で行うため、途中状態が外から観測されることはありません。

use async_trait::async_trait;

use super::{
    entity::{Member, Room, RoomKind},
    event::RoomRef,
    value_object::{ConnectionId, DisplayName, RoomId, Timestamp},
};

/// Result of a join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub room: RoomRef,
    /// Member as stored in the room (the first name wins on repeated joins).
    pub member: Member,
    /// `false` when the connection was already a member.
    pub newly_joined: bool,
    /// Every connection in the room after the join, joiner included.
    pub targets: Vec<ConnectionId>,
    pub roster: Vec<DisplayName>,
}

/// Result of a leave that actually removed an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    pub room: RoomRef,
    pub member: Member,
    /// Remaining connections.
    pub targets: Vec<ConnectionId>,
    pub roster: Vec<DisplayName>,
}

/// Sender presence lookup for a message send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderLookup {
    pub room: RoomRef,
    pub sender: Member,
    /// Every connection in the room, sender included.
    pub targets: Vec<ConnectionId>,
}

/// Presence Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait PresenceRepository: Send + Sync {
    /// 接続を Room に追加（Room が無ければ `kind` で作成）
    async fn join(
        &self,
        room_id: RoomId,
        kind: RoomKind,
        connection_id: ConnectionId,
        member: Member,
        now: Timestamp,
    ) -> JoinOutcome;

    /// 接続を Room から削除（未参加なら None）
    async fn leave(&self, room_id: &RoomId, connection_id: &ConnectionId)
    -> Option<LeaveOutcome>;

    /// 送信者のプレゼンスを検索（未参加なら None）
    async fn find_sender(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Option<SenderLookup>;

    /// 接続が参加している全ての Room の ID を取得
    async fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomId>;

    /// Room を取得
    async fn get_room(&self, room_id: &RoomId) -> Option<Room>;

    /// 全ての Room を取得（ID 順）
    async fn get_rooms(&self) -> Vec<Room>;
}
