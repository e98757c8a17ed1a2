//! In-memory repositories.

pub mod presence;

pub use presence::InMemoryPresenceRepository;
