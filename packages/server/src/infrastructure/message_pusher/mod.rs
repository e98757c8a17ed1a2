//! MessagePusher 実装
//!
//! 接続ごとの送信チャンネルにドメインイベントを JSON フレームとして書き込みます。

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
