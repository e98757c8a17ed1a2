//! CLI chat client for the InstaLite chat relay.
//!
//! Joins rooms, sends messages with a `tempId` for optimistic display and
//! re-joins every room after reconnecting.

pub mod command;
pub mod error;
pub mod formatter;
mod runner;
pub mod session;
pub mod state;
mod ui;

pub use runner::run_client;
pub use session::ClientConfig;
