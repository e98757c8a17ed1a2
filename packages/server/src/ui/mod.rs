//! WebSocket relay server: router, handlers and shared state.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, ServerConfig, build_router};
pub use state::AppState;
