//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::{
        ConnectionId, DisplayName, Member, MessageContent, RoomId, TempId, UserId,
        ValueObjectError,
    },
    infrastructure::dto::websocket::ClientEvent,
    ui::state::AppState,
};

/// Query parameters for WebSocket connection
///
/// `username` (with optional `user_id`) is the identity used by `joinRoom`.
#[derive(Debug, Default, Deserialize)]
pub struct ConnectQuery {
    pub username: Option<String>,
    pub user_id: Option<String>,
}

fn identity_from_query(query: ConnectQuery) -> Result<Option<Member>, ValueObjectError> {
    let Some(username) = query.username else {
        return Ok(None);
    };
    let display_name = DisplayName::new(username)?;
    let user_id = query
        .user_id
        .filter(|id| !id.trim().is_empty())
        .map(UserId::new)
        .transpose()?;
    Ok(Some(Member::new(display_name, user_id)))
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let identity = match identity_from_query(query) {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!("Rejecting connection with invalid identity: {}", e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, identity)))
}

/// Spawns a task that drains the connection's channel into the WebSocket sink.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, identity: Option<Member>) {
    let (sender, mut receiver) = socket.split();

    // Register the outbound channel (ConnectUseCase issues the connection id)
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.connect_usecase.execute(tx).await;
    match &identity {
        Some(member) => tracing::info!(
            "Connection '{}' opened as '{}'",
            connection_id,
            member.display_name
        ),
        None => tracing::info!("Connection '{}' opened without identity", connection_id),
    }

    let mut send_task = pusher_loop(rx, sender);

    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        // inbound events of one connection are handled strictly in order
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    dispatch(
                        &state_clone,
                        &connection_id_clone,
                        identity.as_ref(),
                        text.as_str(),
                    )
                    .await;
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let left = state.disconnect_usecase.execute(&connection_id).await;
    tracing::info!(
        "Connection '{}' closed (left {} rooms)",
        connection_id,
        left.len()
    );
}

fn reject(state: &AppState, connection_id: &ConnectionId, reason: impl std::fmt::Display) {
    state.stats.record_rejected_event();
    tracing::warn!(
        "Rejected event from connection '{}': {}",
        connection_id,
        reason
    );
}

/// Decode one inbound frame and run the matching use case.
async fn dispatch(
    state: &AppState,
    connection_id: &ConnectionId,
    identity: Option<&Member>,
    text: &str,
) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            reject(state, connection_id, format!("malformed frame: {}", e));
            return;
        }
    };

    match event {
        ClientEvent::Join(username) => {
            let display_name = match DisplayName::new(username) {
                Ok(name) => name,
                Err(e) => return reject(state, connection_id, e),
            };
            let user_id = identity.and_then(|member| member.user_id.clone());
            state
                .join_room_usecase
                .join_public(connection_id, Member::new(display_name, user_id))
                .await;
        }
        ClientEvent::JoinRoom(room_id) => {
            let room_id = match RoomId::new(room_id) {
                Ok(id) => id,
                Err(e) => return reject(state, connection_id, e),
            };
            // MissingIdentity is logged and counted by the use case
            let _ = state
                .join_room_usecase
                .join_room(connection_id, room_id, identity.cloned())
                .await;
        }
        ClientEvent::LeaveRoom(room_id) => {
            let room_id = match RoomId::new(room_id) {
                Ok(id) => id,
                Err(e) => return reject(state, connection_id, e),
            };
            state
                .leave_room_usecase
                .execute(connection_id, &room_id)
                .await;
        }
        ClientEvent::SendMessage(payload) | ClientEvent::LegacySendMessage(payload) => {
            let (room_id, content, temp_id) = payload.into_parts();
            let room_id = match room_id.map(RoomId::new).transpose() {
                Ok(id) => id,
                Err(e) => return reject(state, connection_id, e),
            };
            let temp_id = temp_id.map(TempId::new);

            // UnknownSender is logged and counted by the use case
            let _ = state
                .send_message_usecase
                .execute(
                    connection_id,
                    room_id,
                    MessageContent::new(content),
                    temp_id,
                )
                .await;
        }
    }
}
