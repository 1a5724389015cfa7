//! Conversion logic between DTOs and domain entities.

use crate::domain::{Chat, OutboundMessage};
use crate::infrastructure::dto::{http, websocket};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<OutboundMessage> for websocket::ChatFrame {
    fn from(message: OutboundMessage) -> Self {
        Self {
            from: message.from.into_string(),
            text: message.text.into_string(),
        }
    }
}

impl From<Chat> for http::ChatDto {
    fn from(chat: Chat) -> Self {
        Self {
            id: chat.id,
            name: chat.name,
            usernames: chat.usernames,
        }
    }
}
