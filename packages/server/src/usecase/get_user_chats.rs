//! GetUserChats ユースケース

use std::sync::Arc;

use crate::domain::{Chat, ChatRepository, Username};
use crate::usecase::error::GetUserChatsError;

/// GetUserChats ユースケース
pub struct GetUserChatsUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl GetUserChatsUseCase {
    /// 新しい GetUserChatsUseCase を作成
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// ユーザーが属するチャットの一覧を取得する
    pub async fn execute(&self, username: &Username) -> Result<Vec<Chat>, GetUserChatsError> {
        let chats = self.repository.get_user_chats(username).await?;
        Ok(chats)
    }
}
