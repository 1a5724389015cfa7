//! DeleteChat ユースケース

use std::sync::Arc;

use crate::domain::{ChatId, ChatRepository};
use crate::usecase::error::DeleteChatError;

/// DeleteChat ユースケース
///
/// ストア上の論理削除のみを行います。既存の接続は即座には切断されず、
/// 以降の送信・接続がストア検証で拒否されることで収束します。
pub struct DeleteChatUseCase {
    repository: Arc<dyn ChatRepository>,
}

impl DeleteChatUseCase {
    /// 新しい DeleteChatUseCase を作成
    pub fn new(repository: Arc<dyn ChatRepository>) -> Self {
        Self { repository }
    }

    /// チャットを論理削除する
    pub async fn execute(&self, chat_id: ChatId) -> Result<(), DeleteChatError> {
        self.repository.delete_chat(chat_id).await?;
        tracing::info!(%chat_id, "chat deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RepositoryError;
    use crate::infrastructure::repository::InMemoryChatRepository;

    #[tokio::test]
    async fn test_delete_existing_chat_succeeds() {
        // テスト項目: 既存チャットの削除が成功する
        // given (前提条件):
        let repo = Arc::new(InMemoryChatRepository::new());
        let chat_id = repo.create_chat("room", &[]).await.unwrap();
        let usecase = DeleteChatUseCase::new(repo);

        // when (操作):
        let result = usecase.execute(chat_id).await;

        // then (期待する結果):
        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn test_delete_unknown_chat_fails() {
        // テスト項目: 存在しないチャットの削除はエラーになる
        // given (前提条件):
        let repo = Arc::new(InMemoryChatRepository::new());
        let usecase = DeleteChatUseCase::new(repo);

        // when (操作):
        let result = usecase.execute(ChatId::new(42)).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(DeleteChatError::Repository(RepositoryError::ChatNotFound(42)))
        );
    }
}
