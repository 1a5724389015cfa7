//! UseCase 層
//!
//! 各操作を 1 ユースケース 1 構造体で実装します。
//! Repository（ストア）と ChatRegistry（インメモリの部屋状態）に依存し、
//! トランスポートの詳細には依存しません。

pub mod connect_chat;
pub mod create_chat;
pub mod delete_chat;
pub mod disconnect_chat;
pub mod error;
pub mod get_user_chats;
pub mod send_message;

pub use connect_chat::{ChatConnection, ConnectChatUseCase};
pub use create_chat::CreateChatUseCase;
pub use delete_chat::DeleteChatUseCase;
pub use disconnect_chat::DisconnectChatUseCase;
pub use error::{ConnectChatError, CreateChatError, DeleteChatError, GetUserChatsError, SendMessageError};
pub use get_user_chats::GetUserChatsUseCase;
pub use send_message::SendMessageUseCase;
