//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::RoomId,
    infrastructure::dto::http::{
        ErrorDto, HealthDto, RelayStatsDto, RoomMembersDto, RoomSummaryDto,
    },
    ui::state::AppState,
    usecase::{GetRoomDetailError, ListMembersError},
};

type ApiError = (StatusCode, Json<ErrorDto>);

fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorDto {
            error: error.to_string(),
        }),
    )
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
    })
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomSummaryDto>, ApiError> {
    match state.get_room_detail_usecase.execute(room_id).await {
        Ok(room) => Ok(Json(RoomSummaryDto::from(&room))),
        Err(e @ GetRoomDetailError::InvalidRoomId(_)) => Err(api_error(StatusCode::BAD_REQUEST, e)),
        Err(e @ GetRoomDetailError::RoomNotFound(_)) => Err(api_error(StatusCode::NOT_FOUND, e)),
    }
}

/// Current display names of a room
pub async fn get_room_members(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomMembersDto>, ApiError> {
    let room_id = RoomId::new(room_id).map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    match state.list_members_usecase.execute(&room_id).await {
        Ok(members) => Ok(Json(RoomMembersDto {
            room_id: room_id.into_string(),
            users: members.into_iter().map(|n| n.into_string()).collect(),
        })),
        Err(e @ ListMembersError::RoomNotFound(_)) => Err(api_error(StatusCode::NOT_FOUND, e)),
    }
}

/// Relay statistics
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<RelayStatsDto> {
    Json(state.stats.snapshot().into())
}
