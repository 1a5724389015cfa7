//! DisconnectChat ユースケース（接続ライフサイクルの終了）

use std::sync::Arc;

use crate::domain::{ChatId, Username};
use crate::infrastructure::registry::{ChatRegistry, ConnectionHandle};

/// DisconnectChat ユースケース
///
/// 接続の終了経路（クライアント切断・eviction・サーバ停止）は複数あるが、
/// 登録解除は必ずこのユースケースを通る 1 本に集約します。
pub struct DisconnectChatUseCase {
    registry: Arc<ChatRegistry>,
}

impl DisconnectChatUseCase {
    /// 新しい DisconnectChatUseCase を作成
    pub fn new(registry: Arc<ChatRegistry>) -> Self {
        Self { registry }
    }

    /// 接続を部屋から登録解除する
    ///
    /// 同じ接続に対して複数回呼んでも安全です（2 回目以降は無視される）。
    pub async fn execute(&self, chat_id: ChatId, username: &Username, handle: &ConnectionHandle) {
        self.registry.leave(chat_id, username, handle).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChatRepository;
    use crate::infrastructure::repository::InMemoryChatRepository;
    use crate::usecase::connect_chat::ConnectChatUseCase;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 接続解除による部屋の破棄と、冪等性
    //
    // 【なぜこのテストが必要か】
    // - 切断経路が複数あるため、同じ接続の解除が重複実行されても
    //   状態が壊れないことを保証する必要がある
    //
    // 【どのようなシナリオをテストするか】
    // 1. 最後の接続の解除で部屋が破棄される
    // 2. 同じ接続の二重解除が安全に無視される
    // ========================================

    fn username(name: &str) -> Username {
        Username::new(name.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_disconnect_removes_empty_room() {
        // テスト項目: 最後の接続の解除で部屋が破棄される
        // given (前提条件):
        let repo = Arc::new(InMemoryChatRepository::new());
        let chat_id = repo.create_chat("room", &["alice".to_string()]).await.unwrap();
        let registry = ChatRegistry::new();
        let connect = ConnectChatUseCase::new(repo, registry.clone());
        let connection = connect.execute(chat_id, username("alice")).await.unwrap();

        // when (操作):
        let disconnect = DisconnectChatUseCase::new(registry.clone());
        disconnect
            .execute(connection.chat_id, &connection.username, &connection.handle)
            .await;

        // then (期待する結果):
        assert_eq!(registry.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_double_disconnect_is_idempotent() {
        // テスト項目: 同じ接続の二重解除が安全に無視される
        // given (前提条件):
        let repo = Arc::new(InMemoryChatRepository::new());
        let chat_id = repo.create_chat("room", &["alice".to_string()]).await.unwrap();
        let registry = ChatRegistry::new();
        let connect = ConnectChatUseCase::new(repo, registry.clone());
        let connection = connect.execute(chat_id, username("alice")).await.unwrap();
        let disconnect = DisconnectChatUseCase::new(registry.clone());
        disconnect
            .execute(connection.chat_id, &connection.username, &connection.handle)
            .await;

        // when (操作): もう一度解除する
        disconnect
            .execute(connection.chat_id, &connection.username, &connection.handle)
            .await;

        // then (期待する結果): パニックせず、状態もゼロのまま
        assert_eq!(registry.room_count().await, 0);
    }
}
