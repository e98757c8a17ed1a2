//! UseCase: Room の参加者一覧

use std::sync::Arc;

use crate::domain::{DisplayName, PresenceRepository, RoomId};

use super::ListMembersError;

/// 参加者一覧取得のユースケース
pub struct ListMembersUseCase {
    repository: Arc<dyn PresenceRepository>,
}

impl ListMembersUseCase {
    pub fn new(repository: Arc<dyn PresenceRepository>) -> Self {
        Self { repository }
    }

    /// Current display names of the room, unique and sorted.
    ///
    /// An existing but empty room yields an empty list; only a room that was
    /// never joined is `RoomNotFound`.
    pub async fn execute(&self, room_id: &RoomId) -> Result<Vec<DisplayName>, ListMembersError> {
        self.repository
            .get_room(room_id)
            .await
            .map(|room| room.roster())
            .ok_or_else(|| ListMembersError::RoomNotFound(room_id.as_str().to_string()))
    }
}
