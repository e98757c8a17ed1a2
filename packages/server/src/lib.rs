//! Presence and relay layer of the InstaLite chat.
//!
//! Tracks which connections are in which chat rooms and fans membership and
//! message events out to room members over WebSocket.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
