//! HTTP / WebSocket endpoint handlers.

mod http;
mod websocket;

pub use http::{create_chat, delete_chat, get_user_chats, health_check, send_message};
pub use websocket::websocket_handler;
