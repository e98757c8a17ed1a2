//! UseCase: Room 一覧・詳細の取得（HTTP API 用）

use std::sync::Arc;

use crate::domain::{PresenceRepository, Room, RoomId};

use super::GetRoomDetailError;

/// Room 一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn PresenceRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn PresenceRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self) -> Vec<Room> {
        self.repository.get_rooms().await
    }
}

/// Room 詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn PresenceRepository>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn PresenceRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, room_id: String) -> Result<Room, GetRoomDetailError> {
        let room_id = RoomId::new(room_id)?;
        self.repository
            .get_room(&room_id)
            .await
            .ok_or_else(|| GetRoomDetailError::RoomNotFound(room_id.into_string()))
    }
}
