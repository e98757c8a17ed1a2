//! Test doubles shared by the use case tests.

use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use instalite_shared::time::FixedClock;
use tokio::sync::Mutex;

use crate::{
    domain::{
        ConnectionId, DisplayName, Member, MessagePushError, MessagePusher, PusherChannel,
        RoomEvent, RoomId, UserId,
    },
    infrastructure::repository::InMemoryPresenceRepository,
};

use super::RelayStats;

pub const NOW: i64 = 1_700_000_000_000;

/// MessagePusher that records every delivery instead of writing to sockets.
#[derive(Default)]
pub struct RecordingPusher {
    clients: Mutex<HashSet<ConnectionId>>,
    deliveries: Mutex<Vec<(ConnectionId, RoomEvent)>>,
}

impl RecordingPusher {
    pub async fn deliveries(&self) -> Vec<(ConnectionId, RoomEvent)> {
        self.deliveries.lock().await.clone()
    }

    pub async fn events_for(&self, connection_id: &ConnectionId) -> Vec<RoomEvent> {
        self.deliveries
            .lock()
            .await
            .iter()
            .filter(|(target, _)| target == connection_id)
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub async fn clear(&self) {
        self.deliveries.lock().await.clear();
    }

    pub async fn is_registered(&self, connection_id: &ConnectionId) -> bool {
        self.clients.lock().await.contains(connection_id)
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_client(&self, connection_id: ConnectionId, _sender: PusherChannel) {
        self.clients.lock().await.insert(connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        self.clients.lock().await.remove(connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &RoomEvent,
    ) -> Result<(), MessagePushError> {
        self.deliveries
            .lock()
            .await
            .push((connection_id.clone(), event.clone()));
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &RoomEvent,
    ) -> Result<(), MessagePushError> {
        let mut deliveries = self.deliveries.lock().await;
        for target in targets {
            deliveries.push((target, event.clone()));
        }
        Ok(())
    }

    async fn count_clients(&self) -> usize {
        self.clients.lock().await.len()
    }
}

pub fn repository() -> Arc<InMemoryPresenceRepository> {
    Arc::new(InMemoryPresenceRepository::new())
}

pub fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(NOW))
}

pub fn stats() -> Arc<RelayStats> {
    Arc::new(RelayStats::new())
}

pub fn public_room() -> RoomId {
    RoomId::new("default-room".to_string()).unwrap()
}

pub fn room(id: &str) -> RoomId {
    RoomId::new(id.to_string()).unwrap()
}

pub fn member(name: &str) -> Member {
    Member::anonymous(DisplayName::new(name.to_string()).unwrap())
}

pub fn member_with_id(name: &str, user_id: &str) -> Member {
    Member::new(
        DisplayName::new(name.to_string()).unwrap(),
        Some(UserId::new(user_id.to_string()).unwrap()),
    )
}

pub fn names(members: &[DisplayName]) -> Vec<&str> {
    members.iter().map(|name| name.as_str()).collect()
}
