//! Shared application state.

use std::sync::Arc;

use instalite_shared::time::Clock;

use crate::{
    domain::{MessagePusher, PresenceRepository, RoomId},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryPresenceRepository,
    },
    usecase::{
        ConnectUseCase, DisconnectUseCase, GetRoomDetailUseCase, GetRoomsUseCase,
        JoinRoomUseCase, LeaveRoomUseCase, ListMembersUseCase, RelayStats, SendMessageUseCase,
    },
};

/// UseCase 群と統計情報（ハンドラから参照される）
pub struct AppState {
    pub connect_usecase: Arc<ConnectUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    pub list_members_usecase: Arc<ListMembersUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    pub stats: Arc<RelayStats>,
}

impl AppState {
    /// Wire every use case on top of the given repository and pusher.
    ///
    /// Dependencies are created in order:
    /// 1. Repository / MessagePusher (passed in)
    /// 2. UseCases
    pub fn new(
        repository: Arc<dyn PresenceRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        public_room: RoomId,
    ) -> Self {
        let stats = Arc::new(RelayStats::new());

        let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        ));

        Self {
            connect_usecase: Arc::new(ConnectUseCase::new(
                message_pusher.clone(),
                stats.clone(),
            )),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
                stats.clone(),
                public_room.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock,
                stats.clone(),
                public_room,
            )),
            disconnect_usecase: Arc::new(DisconnectUseCase::new(
                repository.clone(),
                message_pusher,
                leave_room_usecase.clone(),
                stats.clone(),
            )),
            leave_room_usecase,
            list_members_usecase: Arc::new(ListMembersUseCase::new(repository.clone())),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(repository)),
            stats,
        }
    }

    /// In-memory presence map and WebSocket pusher.
    pub fn in_memory(public_room: RoomId, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            Arc::new(InMemoryPresenceRepository::new()),
            Arc::new(WebSocketMessagePusher::default()),
            clock,
            public_room,
        )
    }
}
