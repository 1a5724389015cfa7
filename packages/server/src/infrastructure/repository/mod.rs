//! ChatRepository の具体的な実装

pub mod inmemory;
pub mod postgres;

pub use inmemory::InMemoryChatRepository;
pub use postgres::PgChatRepository;
