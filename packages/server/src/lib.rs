//! Idobata chat backend library.
//!
//! Provides chat CRUD and message-sending operations over HTTP plus a
//! long-lived WebSocket stream per connected user, with per-room in-memory
//! fan-out of persisted messages.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// configuration
pub mod config;
