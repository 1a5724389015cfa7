//! CreateChat ユースケース

use std::sync::Arc;

use crate::domain::{ChatId, ChatRepository};
use crate::usecase::error::CreateChatError;

/// CreateChat ユースケース
///
/// チャットの作成はストアだけに影響し、部屋の状態（Registry）には
/// 触れません。部屋は最初の接続時に作られます。
pub struct CreateChatUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl CreateChatUseCase {
    /// 新しい CreateChatUseCase を作成
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// チャットを作成し、採番された ID を返す
    pub async fn execute(
        &self,
        name: String,
        usernames: Vec<String>,
    ) -> Result<ChatId, CreateChatError> {
        if name.is_empty() {
            return Err(CreateChatError::EmptyChatName);
        }
        if usernames.is_empty() {
            return Err(CreateChatError::EmptyUsernames);
        }
        let chat_id = self.repository.create_chat(&name, &usernames).await?;
        tracing::info!(%chat_id, name, "chat created");
        Ok(chat_id)
    }
}
