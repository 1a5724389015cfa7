//! Data Transfer Objects (DTOs) for the chat backend.
//!
//! DTOs are organized by protocol:
//! - `http`: HTTP API request/response DTOs
//! - `websocket`: WebSocket frame DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
