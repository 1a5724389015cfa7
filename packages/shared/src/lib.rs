//! Shared utilities for the idobata chat backend.

pub mod logger;
pub mod time;
