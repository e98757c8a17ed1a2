//! Request handlers.

mod http;
mod websocket;

pub use http::{get_room_detail, get_room_members, get_rooms, get_stats, health_check};
pub use websocket::websocket_handler;
