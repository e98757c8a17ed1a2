//! WebSocket client session management.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use tokio::{
    net::TcpStream,
    sync::{Mutex, mpsc},
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, http::StatusCode, protocol::Message},
};

use instalite_server::infrastructure::dto::websocket::{
    ChatRoomEvent, ClientEvent, OutgoingMessage, PublicRoomEvent, SendMessagePayload, ServerEvent,
};

use crate::{
    command::{Command, parse_command},
    error::ClientError,
    formatter::MessageFormatter,
    state::ClientState,
    ui::redisplay_prompt,
};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Connection settings given on the command line
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket endpoint, e.g. `ws://127.0.0.1:8080/ws`
    pub url: String,
    pub username: String,
    pub user_id: Option<String>,
    /// Rooms to join on startup (multi-room mode)
    pub rooms: Vec<String>,
    /// Use the legacy `join` / `send-message` events on the public room
    pub legacy: bool,
}

impl ClientConfig {
    /// URL with the identity as query parameters
    pub fn connect_url(&self) -> String {
        let mut url = format!(
            "{}?username={}",
            self.url,
            urlencoding::encode(&self.username)
        );
        if let Some(user_id) = &self.user_id {
            url.push_str(&format!("&user_id={}", urlencoding::encode(user_id)));
        }
        url
    }
}

/// Events sent right after connecting.
///
/// After a reconnect this re-joins every room joined so far; the server
/// keeps no session state across connections.
pub fn initial_events(config: &ClientConfig, state: &ClientState) -> Vec<ClientEvent> {
    if config.legacy {
        return vec![ClientEvent::Join(config.username.clone())];
    }
    state
        .joined_rooms()
        .iter()
        .map(|room| ClientEvent::JoinRoom(room.clone()))
        .collect()
}

/// Update the local state with an inbound event and render it.
pub fn on_server_event(state: &mut ClientState, event: ServerEvent, me: &str) -> String {
    match event {
        ServerEvent::Public(event) => match event {
            PublicRoomEvent::UserJoined(name) => MessageFormatter::format_member_joined(None, &name),
            PublicRoomEvent::UserLeft(name) => MessageFormatter::format_member_left(None, &name),
            PublicRoomEvent::UserList(users) => MessageFormatter::format_roster(None, &users, me),
            PublicRoomEvent::ReceiveMessage(message) => {
                let delivered = message
                    .temp_id
                    .as_deref()
                    .and_then(|temp_id| state.confirm(temp_id))
                    .is_some();
                MessageFormatter::format_chat_message(
                    None,
                    &message.sender,
                    &message.content,
                    &message.timestamp,
                    delivered,
                )
            }
            PublicRoomEvent::JoinedRoom(joined) => {
                state.remember_room(&joined.room_id);
                MessageFormatter::format_joined_room(&joined.room_id)
            }
        },
        ServerEvent::Chat(event) => match event {
            ChatRoomEvent::UserJoinedChat(member) => {
                MessageFormatter::format_member_joined(Some(&member.room_id), &member.username)
            }
            ChatRoomEvent::UserLeftChat(member) => {
                MessageFormatter::format_member_left(Some(&member.room_id), &member.username)
            }
            ChatRoomEvent::UserList(roster) => {
                MessageFormatter::format_roster(Some(&roster.room_id), &roster.users, me)
            }
            ChatRoomEvent::ReceiveMessage(message) => {
                let delivered = message
                    .temp_id
                    .as_deref()
                    .and_then(|temp_id| state.confirm(temp_id))
                    .is_some();
                MessageFormatter::format_chat_message(
                    Some(&message.room_id),
                    &message.sender,
                    &message.content,
                    &message.timestamp,
                    delivered,
                )
            }
            ChatRoomEvent::JoinedRoom(joined) => {
                state.remember_room(&joined.room_id);
                MessageFormatter::format_joined_room(&joined.room_id)
            }
        },
    }
}

/// What to do with one line typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum InputAction {
    Send(ClientEvent),
    Print(String),
    Quit,
}

/// Turn a typed line into an outbound event or local output.
pub fn on_input(state: &mut ClientState, config: &ClientConfig, line: &str) -> InputAction {
    let command = match parse_command(line) {
        Ok(command) => command,
        Err(e) => return InputAction::Print(MessageFormatter::format_notice(&e.to_string())),
    };

    if config.legacy && !matches!(command, Command::Text(_) | Command::Quit) {
        return InputAction::Print(MessageFormatter::format_notice(
            "room commands are not available in legacy mode",
        ));
    }

    match command {
        Command::Quit => InputAction::Quit,
        Command::Rooms => InputAction::Print(MessageFormatter::format_rooms(
            state.joined_rooms(),
            state.active_room(),
        )),
        Command::Join(room) => {
            state.remember_room(&room);
            InputAction::Send(ClientEvent::JoinRoom(room))
        }
        Command::Leave(room) => {
            state.forget_room(&room);
            InputAction::Send(ClientEvent::LeaveRoom(room))
        }
        Command::Switch(room) => {
            if state.switch_to(&room) {
                InputAction::Print(MessageFormatter::format_notice(&format!(
                    "now talking in #{}",
                    room
                )))
            } else {
                InputAction::Print(MessageFormatter::format_notice(&format!(
                    "not in #{}; use /join {} first",
                    room, room
                )))
            }
        }
        Command::Text(content) if content.is_empty() => InputAction::Print(String::new()),
        Command::Text(content) if config.legacy => InputAction::Send(
            ClientEvent::LegacySendMessage(SendMessagePayload::Text(content)),
        ),
        Command::Text(content) => {
            let Some(room) = state.active_room().map(str::to_string) else {
                return InputAction::Print(MessageFormatter::format_notice(
                    "join a room first with /join <room>",
                ));
            };
            let temp_id = state.add_pending(content.clone());
            InputAction::Send(ClientEvent::SendMessage(SendMessagePayload::Message(
                OutgoingMessage {
                    room_id: Some(room),
                    content,
                    temp_id: Some(temp_id),
                },
            )))
        }
    }
}

async fn send_event(write: &mut WsSink, event: &ClientEvent) -> Result<(), ClientError> {
    let json = serde_json::to_string(event)?;
    write
        .send(Message::Text(json.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))
}

/// Forward typed lines until the user quits or the input closes.
async fn input_loop(
    write: &mut WsSink,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
    state: &Mutex<ClientState>,
    config: &ClientConfig,
) -> Result<(), ClientError> {
    while let Some(line) = input_rx.recv().await {
        let action = on_input(&mut *state.lock().await, config, &line);
        match action {
            InputAction::Send(event) => send_event(write, &event).await?,
            InputAction::Print(output) => {
                print!("{}", output);
                redisplay_prompt(&config.username);
            }
            InputAction::Quit => break,
        }
    }

    // Ctrl+C / Ctrl+D / /quit
    write.send(Message::Close(None)).await.ok();
    Ok(())
}

/// Run one WebSocket client session
///
/// Returns `Ok(())` when the user quits and an error when the connection is lost.
pub async fn run_client_session(
    config: &ClientConfig,
    state: &Arc<Mutex<ClientState>>,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) =
        connect_async(config.connect_url())
            .await
            .map_err(|e| match &e {
                tungstenite::Error::Http(response)
                    if response.status() == StatusCode::BAD_REQUEST =>
                {
                    ClientError::Rejected(format!("invalid username '{}'", config.username))
                }
                _ => ClientError::ConnectionError(e.to_string()),
            })?;

    tracing::info!("Connected to chat server!");
    println!(
        "\nYou are '{}'. Type messages and press Enter to send. /quit to exit.\n",
        config.username
    );

    let (mut write, mut read) = ws_stream.split();

    let events = {
        let mut state = state.lock().await;
        let discarded = state.begin_session();
        if discarded > 0 {
            tracing::warn!("Discarding {} unconfirmed message(s) from the previous session", discarded);
        }
        initial_events(config, &state)
    };
    for event in &events {
        send_event(&mut write, event).await?;
    }

    // Spawn a task to handle incoming messages
    let state_for_read = state.clone();
    let username = config.username.clone();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let output = match serde_json::from_str::<ServerEvent>(text.as_str()) {
                        Ok(event) => {
                            on_server_event(&mut *state_for_read.lock().await, event, &username)
                        }
                        Err(_) => MessageFormatter::format_raw_message(text.as_str()),
                    };
                    print!("{}", output);
                    redisplay_prompt(&username);
                }
                Ok(Message::Binary(data)) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt(&username);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, stop the other
    tokio::select! {
        _ = &mut read_task => {
            Err(ClientError::ConnectionError("Connection lost".to_string()))
        }
        result = input_loop(&mut write, input_rx, state, config) => {
            read_task.abort();
            result
        }
    }
}
