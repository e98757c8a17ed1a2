//! Integration tests for the chat relay.
//!
//! The router is served in-process on an ephemeral port and driven with
//! real WebSocket clients (tokio-tungstenite) and HTTP requests (reqwest).

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use instalite_server::{
    domain::RoomId,
    ui::{AppState, build_router},
};
use instalite_shared::time::FixedClock;
use serde_json::{Value, json};
use tokio::{net::TcpStream, task::JoinHandle, time::timeout};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const NOW: i64 = 1_672_531_200_123;
const NOW_ISO: &str = "2023-01-01T00:00:00.123Z";
const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const SILENCE: Duration = Duration::from_millis(300);

/// Helper struct to manage an in-process server
struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn start() -> Self {
        let state = Arc::new(AppState::in_memory(
            RoomId::new("default-room".to_string()).unwrap(),
            Arc::new(FixedClock::new(NOW)),
        ));
        let app = build_router(state, &[]);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer { addr, handle }
    }

    fn ws_url(&self, query: &str) -> String {
        format!("ws://{}/ws{}", self.addr, query)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::get(format!("http://{}{}", self.addr, path))
            .await
            .unwrap()
    }

    async fn stats(&self) -> Value {
        self.get("/api/stats").await.json().await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Helper struct wrapping one WebSocket client
struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    async fn connect(server: &TestServer, query: &str) -> Self {
        let (ws, _) = connect_async(server.ws_url(query)).await.unwrap();
        TestClient { ws }
    }

    async fn send(&mut self, frame: Value) {
        self.ws
            .send(Message::Text(frame.to_string().into()))
            .await
            .unwrap();
    }

    async fn send_raw(&mut self, text: &str) {
        self.ws
            .send(Message::Text(text.to_string().into()))
            .await
            .unwrap();
    }

    /// Receive the next JSON frame
    async fn recv(&mut self) -> Value {
        loop {
            let msg = timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("connection closed")
                .unwrap();
            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).unwrap();
            }
        }
    }

    /// Receive `count` frames
    async fn recv_many(&mut self, count: usize) -> Vec<Value> {
        let mut frames = Vec::with_capacity(count);
        for _ in 0..count {
            frames.push(self.recv().await);
        }
        frames
    }

    /// Assert that no frame arrives for a while
    async fn expect_silence(&mut self) {
        if let Ok(Some(Ok(Message::Text(text)))) = timeout(SILENCE, self.ws.next()).await {
            panic!("unexpected frame: {}", text.as_str());
        }
    }

    async fn close(mut self) {
        self.ws.close(None).await.unwrap();
    }
}

async fn join_chat(client: &mut TestClient, room: &str) -> Vec<Value> {
    client.send(json!({"event": "joinRoom", "data": room})).await;
    // userJoinedChat, user-list, joinedRoom
    client.recv_many(3).await
}

fn events(frames: &[Value]) -> Vec<&str> {
    frames
        .iter()
        .map(|f| f["event"].as_str().unwrap_or_default())
        .collect()
}

#[tokio::test]
async fn test_join_room_is_idempotent() {
    // テスト項目: 同じ接続が同じ Room に二度参加してもエントリは一つで、参加通知は再送されない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server, "?username=alice&user_id=1").await;
    let first = join_chat(&mut alice, "chat-1").await;

    // when (操作):
    alice.send(json!({"event": "joinRoom", "data": "chat-1"})).await;
    let second = alice.recv_many(2).await;

    // then (期待する結果):
    assert_eq!(events(&first), vec!["userJoinedChat", "user-list", "joinedRoom"]);
    assert_eq!(
        first[0]["data"],
        json!({"username": "alice", "userId": "1", "roomId": "chat-1"})
    );
    assert_eq!(
        second,
        vec![
            json!({"event": "user-list", "data": {"roomId": "chat-1", "users": ["alice"]}}),
            json!({"event": "joinedRoom", "data": {"roomId": "chat-1"}}),
        ]
    );
    let members: Value = server
        .get("/api/rooms/chat-1/members")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(members, json!({"roomId": "chat-1", "users": ["alice"]}));
}

#[tokio::test]
async fn test_leave_room_notifies_remaining_members() {
    // テスト項目: 退出すると残りのメンバーに退出者の名前と新しい参加者リストが届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server, "?username=alice").await;
    let mut bob = TestClient::connect(&server, "?username=bob").await;
    join_chat(&mut alice, "chat-1").await;
    join_chat(&mut bob, "chat-1").await;
    // alice: bob の userJoinedChat と user-list
    alice.recv_many(2).await;

    // when (操作):
    bob.send(json!({"event": "leaveRoom", "data": "chat-1"})).await;

    // then (期待する結果):
    let frames = alice.recv_many(2).await;
    assert_eq!(
        frames[0],
        json!({"event": "userLeftChat", "data": {"username": "bob", "roomId": "chat-1"}})
    );
    assert_eq!(
        frames[1],
        json!({"event": "user-list", "data": {"roomId": "chat-1", "users": ["alice"]}})
    );
    bob.expect_silence().await;
}

#[tokio::test]
async fn test_message_from_unknown_sender_is_dropped() {
    // テスト項目: Room に参加していない接続からのメッセージはブロードキャストされず、破棄数が増える
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server, "?username=alice").await;
    let mut mallory = TestClient::connect(&server, "?username=mallory").await;
    join_chat(&mut alice, "chat-1").await;

    // when (操作):
    mallory
        .send(json!({"event": "sendMessage", "data": {"room_id": "chat-1", "content": "hi"}}))
        .await;

    // then (期待する結果):
    alice.expect_silence().await;
    mallory.expect_silence().await;
    assert_eq!(server.stats().await["dropped_messages"], 1);
}

#[tokio::test]
async fn test_disconnect_leaves_every_room() {
    // テスト項目: 切断すると参加中の全ての Room から退出し、それぞれの Room に退出通知が届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server, "?username=alice").await;
    let mut bob = TestClient::connect(&server, "?username=bob").await;

    alice.send(json!({"event": "join", "data": "alice"})).await;
    alice.recv_many(3).await;
    join_chat(&mut alice, "chat-1").await;

    bob.send(json!({"event": "join", "data": "bob"})).await;
    bob.recv_many(3).await;
    join_chat(&mut bob, "chat-1").await;

    // when (操作):
    alice.close().await;

    // then (期待する結果):
    let frames = bob.recv_many(4).await;
    let names = events(&frames);
    assert!(names.contains(&"user-left"));
    assert!(names.contains(&"userLeftChat"));
    assert!(frames.contains(&json!({"event": "user-left", "data": "alice"})));
    assert!(frames.contains(&json!({"event": "user-list", "data": ["bob"]})));
    assert!(frames.contains(
        &json!({"event": "user-list", "data": {"roomId": "chat-1", "users": ["bob"]}})
    ));

    let rooms: Value = server.get("/api/rooms").await.json().await.unwrap();
    assert_eq!(rooms.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_message_echo_includes_sender_and_temp_id() {
    // テスト項目: メッセージは送信者自身にも届き、tempId がそのまま返る
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server, "").await;
    let mut bob = TestClient::connect(&server, "").await;
    alice.send(json!({"event": "join", "data": "alice"})).await;
    alice.recv_many(3).await;
    bob.send(json!({"event": "join", "data": "bob"})).await;
    bob.recv_many(3).await;
    alice.recv_many(2).await;

    // when (操作):
    alice
        .send(json!({"event": "send-message", "data": {"content": "hi", "tempId": "t-1"}}))
        .await;

    // then (期待する結果):
    let expected = json!({
        "event": "receive-message",
        "data": {"sender": "alice", "content": "hi", "timestamp": NOW_ISO, "tempId": "t-1"}
    });
    assert_eq!(alice.recv().await, expected);
    assert_eq!(bob.recv().await, expected);
}

#[tokio::test]
async fn test_chat_room_message_carries_room_and_sender_id() {
    // テスト項目: チャットルームのメッセージは roomId と senderId を含む
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server, "?username=alice&user_id=7").await;
    join_chat(&mut alice, "chat-1").await;

    // when (操作):
    alice
        .send(json!({"event": "sendMessage", "data": {"roomId": "chat-1", "content": "hello"}}))
        .await;

    // then (期待する結果):
    assert_eq!(
        alice.recv().await,
        json!({
            "event": "receiveMessage",
            "data": {
                "sender": "alice",
                "senderId": "7",
                "roomId": "chat-1",
                "content": "hello",
                "timestamp": NOW_ISO
            }
        })
    );
}

#[tokio::test]
async fn test_rejected_events_keep_connection_open() {
    // テスト項目: 不正なフレームと identity の無い joinRoom は拒否数に数えられ、接続は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut anonymous = TestClient::connect(&server, "").await;

    // when (操作):
    anonymous.send_raw("not json").await;
    anonymous.send(json!({"event": "joinRoom", "data": "chat-1"})).await;
    anonymous.send(json!({"event": "leaveRoom", "data": "  "})).await;
    anonymous.expect_silence().await;

    // then (期待する結果):
    assert_eq!(server.stats().await["rejected_events"], 3);
    anonymous.send(json!({"event": "join", "data": "anon"})).await;
    let frames = anonymous.recv_many(3).await;
    assert_eq!(events(&frames), vec!["user-joined", "user-list", "joinedRoom"]);
}

#[tokio::test]
async fn test_blank_username_is_rejected_at_connect() {
    // テスト項目: 空白のみの username での接続は拒否される
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let result = connect_async(server.ws_url("?username=%20")).await;

    // then (期待する結果):
    assert!(result.is_err());
}

#[tokio::test]
async fn test_http_room_endpoints() {
    // テスト項目: HTTP API でヘルスチェック・Room 詳細・存在しない Room を確認できる
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server, "").await;
    alice.send(json!({"event": "join", "data": "alice"})).await;
    alice.recv_many(3).await;

    // when (操作):
    let health: Value = server.get("/api/health").await.json().await.unwrap();
    let room: Value = server
        .get("/api/rooms/default-room")
        .await
        .json()
        .await
        .unwrap();
    let missing = server.get("/api/rooms/nowhere").await;
    let missing_members = server.get("/api/rooms/nowhere/members").await;

    // then (期待する結果):
    assert_eq!(health, json!({"status": "ok"}));
    assert_eq!(
        room,
        json!({
            "id": "default-room",
            "kind": "public",
            "members": ["alice"],
            "created_at": NOW_ISO
        })
    );
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
    assert_eq!(missing_members.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_leaving_one_room_keeps_other_memberships() {
    // テスト項目: 複数の Room に参加中の接続が一つの Room から退出しても、他の Room の参加状態は維持される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server, "?username=alice").await;
    let mut bob = TestClient::connect(&server, "?username=bob").await;
    join_chat(&mut alice, "chat-1").await;
    join_chat(&mut alice, "chat-2").await;
    join_chat(&mut bob, "chat-1").await;
    // alice: bob の userJoinedChat と user-list
    alice.recv_many(2).await;

    // when (操作):
    alice
        .send(json!({"event": "leaveRoom", "data": "chat-1"}))
        .await;
    // bob: alice の userLeftChat と user-list
    bob.recv_many(2).await;

    // then (期待する結果):
    let chat_1: Value = server
        .get("/api/rooms/chat-1/members")
        .await
        .json()
        .await
        .unwrap();
    let chat_2: Value = server
        .get("/api/rooms/chat-2/members")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(chat_1, json!({"roomId": "chat-1", "users": ["bob"]}));
    assert_eq!(chat_2, json!({"roomId": "chat-2", "users": ["alice"]}));

    alice
        .send(json!({"event": "sendMessage", "data": {"roomId": "chat-2", "content": "still here"}}))
        .await;
    let message = alice.recv().await;
    assert_eq!(message["event"], "receiveMessage");
    assert_eq!(message["data"]["roomId"], "chat-2");
    assert_eq!(message["data"]["content"], "still here");
    assert_eq!(server.stats().await["dropped_messages"], 0);
    bob.expect_silence().await;
}

#[tokio::test]
async fn test_long_and_padded_names_are_relayed_as_given() {
    // テスト項目: 長い名前や前後に空白のある名前も加工されずに参加・送信できる
    // given (前提条件):
    let server = TestServer::start().await;
    let long_name = "a".repeat(65);
    let mut long = TestClient::connect(&server, "").await;
    let mut padded = TestClient::connect(&server, "").await;

    // when (操作):
    long.send(json!({"event": "join", "data": long_name})).await;
    let long_frames = long.recv_many(3).await;
    padded.send(json!({"event": "join", "data": "  alice  "})).await;
    let padded_frames = padded.recv_many(3).await;
    long.send(json!({"event": "send-message", "data": "hello"}))
        .await;

    // then (期待する結果):
    assert_eq!(
        long_frames[0],
        json!({"event": "user-joined", "data": long_name})
    );
    assert_eq!(
        padded_frames[0],
        json!({"event": "user-joined", "data": "  alice  "})
    );
    // long: padded の user-joined と user-list の後にメッセージ
    let frames = long.recv_many(3).await;
    assert_eq!(frames[2]["event"], "receive-message");
    assert_eq!(frames[2]["data"]["sender"], json!(long_name));

    let stats = server.stats().await;
    assert_eq!(stats["rejected_events"], 0);
    assert_eq!(stats["dropped_messages"], 0);

    let via_query = connect_async(server.ws_url(&format!("?username={}", long_name))).await;
    assert!(via_query.is_ok());
}

#[tokio::test]
async fn test_empty_temp_id_is_echoed_unchanged() {
    // テスト項目: 空文字列の tempId も拒否されずにそのまま返る
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server, "?username=alice").await;
    join_chat(&mut alice, "chat-1").await;

    // when (操作):
    alice
        .send(json!({"event": "sendMessage", "data": {"roomId": "chat-1", "content": "x", "tempId": ""}}))
        .await;

    // then (期待する結果):
    let message = alice.recv().await;
    assert_eq!(message["event"], "receiveMessage");
    assert_eq!(message["data"]["tempId"], "");
    assert_eq!(server.stats().await["rejected_events"], 0);
}
