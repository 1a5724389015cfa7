//! Server state shared across handlers.

use std::sync::Arc;

use crate::infrastructure::auth::AccessChecker;
use crate::usecase::{
    ConnectChatUseCase, CreateChatUseCase, DeleteChatUseCase, DisconnectChatUseCase,
    GetUserChatsUseCase, SendMessageUseCase,
};

/// Shared application state
pub struct AppState {
    /// CreateChatUseCase（チャット作成のユースケース）
    pub create_chat_usecase: Arc<CreateChatUseCase>,
    /// DeleteChatUseCase（チャット削除のユースケース）
    pub delete_chat_usecase: Arc<DeleteChatUseCase>,
    /// GetUserChatsUseCase（チャット一覧取得のユースケース）
    pub get_user_chats_usecase: Arc<GetUserChatsUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// ConnectChatUseCase（チャット接続のユースケース）
    pub connect_chat_usecase: Arc<ConnectChatUseCase>,
    /// DisconnectChatUseCase（チャット切断のユースケース）
    pub disconnect_chat_usecase: Arc<DisconnectChatUseCase>,
    /// AccessChecker（認可チェックの抽象化）
    pub access_checker: Arc<dyn AccessChecker>,
}
