//! InMemory Presence Repository 実装
//!
//! ドメイン層が定義する PresenceRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。プロセスが終了すると全ての
//! 参加状態は失われ、再起動後はクライアントの再参加によって再構築されます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, JoinOutcome, LeaveOutcome, Member, PresenceRepository, Room, RoomId, RoomKind,
    RoomRef, SenderLookup, Timestamp,
};

/// インメモリ Presence Repository 実装
///
/// room id → Room（connection id → member）のマップを保持します。
#[derive(Default)]
pub struct InMemoryPresenceRepository {
    rooms: Mutex<HashMap<RoomId, Room>>,
}

impl InMemoryPresenceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn room_ref(room: &Room) -> RoomRef {
    RoomRef::new(room.id.clone(), room.kind)
}

#[async_trait]
impl PresenceRepository for InMemoryPresenceRepository {
    async fn join(
        &self,
        room_id: RoomId,
        kind: RoomKind,
        connection_id: ConnectionId,
        member: Member,
        now: Timestamp,
    ) -> JoinOutcome {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.entry(room_id.clone()).or_insert_with(|| {
            tracing::debug!("Room '{}' created ({})", room_id, kind.as_str());
            Room::new(room_id, kind, now)
        });

        let newly_joined = room.add_member(connection_id.clone(), member.clone());
        // 再参加の場合は保存済みのメンバー（最初の表示名）を返す
        let member = room.member(&connection_id).cloned().unwrap_or(member);

        JoinOutcome {
            room: room_ref(room),
            member,
            newly_joined,
            targets: room.connection_ids(),
            roster: room.roster(),
        }
    }

    async fn leave(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Option<LeaveOutcome> {
        let mut rooms = self.rooms.lock().await;
        let room = rooms.get_mut(room_id)?;
        let member = room.remove_member(connection_id)?;

        Some(LeaveOutcome {
            room: room_ref(room),
            member,
            targets: room.connection_ids(),
            roster: room.roster(),
        })
    }

    async fn find_sender(
        &self,
        room_id: &RoomId,
        connection_id: &ConnectionId,
    ) -> Option<SenderLookup> {
        let rooms = self.rooms.lock().await;
        let room = rooms.get(room_id)?;
        let sender = room.member(connection_id)?.clone();

        Some(SenderLookup {
            room: room_ref(room),
            sender,
            targets: room.connection_ids(),
        })
    }

    async fn rooms_of(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        let rooms = self.rooms.lock().await;
        rooms
            .values()
            .filter(|room| room.contains(connection_id))
            .map(|room| room.id.clone())
            .collect()
    }

    async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).cloned()
    }

    async fn get_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        let mut all: Vec<Room> = rooms.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }
}
