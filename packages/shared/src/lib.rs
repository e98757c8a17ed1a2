//! Shared utilities for the InstaLite chat relay (logging, time).

pub mod logger;
pub mod time;
