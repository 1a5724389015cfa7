//! InMemory Chat Repository 実装
//!
//! ドメイン層が定義する ChatRepository trait のインメモリ実装。
//! 単体テスト・シナリオテストと、DB なしのローカル実行で使用します。
//! 1 つの Mutex の下で全状態を変更するため、トランザクション実装と
//! 同じ「全て適用されるか、何も適用されないか」の性質を持ちます。

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use idobata_shared::time::{Clock, SystemClock};

use crate::domain::{Chat, ChatId, ChatRepository, MessageText, RepositoryError, Username};

/// 保存済みメッセージ（テストでの検証用に公開）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub chat_id: i64,
    pub from: String,
    pub text: String,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
struct ChatRecord {
    name: String,
    usernames: Vec<String>,
    is_deleted: bool,
}

#[derive(Default)]
struct Store {
    chats: HashMap<i64, ChatRecord>,
    /// チャット作成時に登録された既知のユーザー名
    users: HashSet<String>,
    messages: Vec<StoredMessage>,
    next_chat_id: i64,
}

/// インメモリ Chat Repository 実装
pub struct InMemoryChatRepository {
    store: Mutex<Store>,
    clock: Arc<dyn Clock>,
}

impl InMemoryChatRepository {
    /// 新しい InMemoryChatRepository を作成
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Clock を指定して作成（テスト用途）
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: Mutex::new(Store {
                chats: HashMap::new(),
                users: HashSet::new(),
                messages: Vec::new(),
                next_chat_id: 1,
            }),
            clock,
        }
    }

    /// チャットに保存されたメッセージを取得する（テストでの検証用）
    pub async fn saved_messages(&self, chat_id: ChatId) -> Vec<StoredMessage> {
        let store = self.store.lock().await;
        store
            .messages
            .iter()
            .filter(|m| m.chat_id == chat_id.value())
            .cloned()
            .collect()
    }
}

impl Default for InMemoryChatRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn create_chat(
        &self,
        name: &str,
        usernames: &[String],
    ) -> Result<ChatId, RepositoryError> {
        let mut store = self.store.lock().await;
        let chat_id = store.next_chat_id;
        store.next_chat_id += 1;
        store.chats.insert(
            chat_id,
            ChatRecord {
                name: name.to_string(),
                usernames: usernames.to_vec(),
                is_deleted: false,
            },
        );
        for username in usernames {
            store.users.insert(username.clone());
        }
        Ok(ChatId::new(chat_id))
    }

    async fn delete_chat(&self, chat_id: ChatId) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().await;
        match store.chats.get_mut(&chat_id.value()) {
            Some(record) if !record.is_deleted => {
                record.is_deleted = true;
                Ok(())
            }
            _ => Err(RepositoryError::ChatNotFound(chat_id.value())),
        }
    }

    async fn get_user_chats(&self, username: &Username) -> Result<Vec<Chat>, RepositoryError> {
        let store = self.store.lock().await;
        let mut chats: Vec<Chat> = store
            .chats
            .iter()
            .filter(|(_, record)| {
                !record.is_deleted && record.usernames.iter().any(|u| u == username.as_str())
            })
            .map(|(id, record)| Chat {
                id: *id,
                name: record.name.clone(),
                usernames: record.usernames.clone(),
            })
            .collect();
        chats.sort_by_key(|chat| chat.id);
        Ok(chats)
    }

    async fn save_message(
        &self,
        chat_id: ChatId,
        from: &Username,
        text: &MessageText,
    ) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().await;
        // チャットの存在・ユーザーの存在・メンバーシップを
        // ストア側でも再検証する（Postgres 実装と同じ順序）
        let record = store
            .chats
            .get(&chat_id.value())
            .filter(|record| !record.is_deleted)
            .ok_or(RepositoryError::ChatNotFound(chat_id.value()))?;
        if !store.users.contains(from.as_str()) {
            return Err(RepositoryError::UserNotFound(from.as_str().to_string()));
        }
        if !record.usernames.iter().any(|u| u == from.as_str()) {
            return Err(RepositoryError::NotAMember {
                username: from.as_str().to_string(),
                chat_id: chat_id.value(),
            });
        }
        let created_at = self.clock.now_millis();
        store.messages.push(StoredMessage {
            chat_id: chat_id.value(),
            from: from.as_str().to_string(),
            text: text.as_str().to_string(),
            created_at,
        });
        Ok(())
    }

    async fn check_chat(
        &self,
        chat_id: ChatId,
        username: &Username,
    ) -> Result<(), RepositoryError> {
        let store = self.store.lock().await;
        let record = store
            .chats
            .get(&chat_id.value())
            .filter(|record| !record.is_deleted)
            .ok_or(RepositoryError::ChatNotFound(chat_id.value()))?;
        if !store.users.contains(username.as_str()) {
            return Err(RepositoryError::UserNotFound(
                username.as_str().to_string(),
            ));
        }
        if !record.usernames.iter().any(|u| u == username.as_str()) {
            return Err(RepositoryError::NotAMember {
                username: username.as_str().to_string(),
                chat_id: chat_id.value(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idobata_shared::time::FixedClock;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryChatRepository の CRUD 操作と検証ロジック
    //
    // 【なぜこのテストが必要か】
    // - この実装はシナリオテストの土台であり、
    //   Postgres 実装と同じ契約（存在検証・メンバー検証・論理削除）を
    //   満たしていることを保証する必要がある
    //
    // 【どのようなシナリオをテストするか】
    // 1. チャット作成と ID 採番
    // 2. 論理削除と、削除済みチャットの不可視化
    // 3. メッセージ保存時の再検証（存在しないチャット・未知のユーザー・非メンバー）
    // 4. ユーザーのチャット一覧（削除済みの除外）
    // ========================================

    fn username(name: &str) -> Username {
        Username::new(name.to_string()).unwrap()
    }

    fn text(s: &str) -> MessageText {
        MessageText::new(s.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_create_chat_assigns_sequential_ids() {
        // テスト項目: チャット作成で ID が順番に採番される
        // given (前提条件):
        let repo = InMemoryChatRepository::new();
        let members = vec!["alice".to_string(), "bob".to_string()];

        // when (操作):
        let first = repo.create_chat("room one", &members).await.unwrap();
        let second = repo.create_chat("room two", &members).await.unwrap();

        // then (期待する結果):
        assert_eq!(first.value(), 1);
        assert_eq!(second.value(), 2);
    }

    #[tokio::test]
    async fn test_delete_chat_hides_it_from_checks() {
        // テスト項目: 削除したチャットは check_chat で見えなくなる
        // given (前提条件):
        let repo = InMemoryChatRepository::new();
        let members = vec!["alice".to_string()];
        let chat_id = repo.create_chat("room", &members).await.unwrap();
        repo.check_chat(chat_id, &username("alice")).await.unwrap();

        // when (操作):
        repo.delete_chat(chat_id).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            repo.check_chat(chat_id, &username("alice")).await,
            Err(RepositoryError::ChatNotFound(chat_id.value()))
        );
    }

    #[tokio::test]
    async fn test_delete_nonexistent_chat_fails() {
        // テスト項目: 存在しないチャットの削除はエラーになる
        // given (前提条件):
        let repo = InMemoryChatRepository::new();

        // when (操作):
        let result = repo.delete_chat(ChatId::new(99)).await;

        // then (期待する結果):
        assert_eq!(result, Err(RepositoryError::ChatNotFound(99)));
    }

    #[tokio::test]
    async fn test_save_message_validates_membership() {
        // テスト項目: 非メンバーのメッセージ保存が拒否される
        // given (前提条件): mallory は別のチャットには属している
        let repo = InMemoryChatRepository::new();
        repo.create_chat("other", &["mallory".to_string()])
            .await
            .unwrap();
        let chat_id = repo
            .create_chat("room", &["alice".to_string()])
            .await
            .unwrap();

        // when (操作):
        let result = repo
            .save_message(chat_id, &username("mallory"), &text("hi"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::NotAMember {
                username: "mallory".to_string(),
                chat_id: chat_id.value(),
            })
        );
        assert!(repo.saved_messages(chat_id).await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user_is_distinguished_from_non_member() {
        // テスト項目: 未知のユーザーが非メンバーとは別のエラーになる
        // given (前提条件):
        let repo = InMemoryChatRepository::new();
        let chat_id = repo
            .create_chat("room", &["alice".to_string()])
            .await
            .unwrap();

        // when (操作):
        let check = repo.check_chat(chat_id, &username("ghost")).await;
        let save = repo
            .save_message(chat_id, &username("ghost"), &text("hi"))
            .await;

        // then (期待する結果):
        assert_eq!(
            check,
            Err(RepositoryError::UserNotFound("ghost".to_string()))
        );
        assert_eq!(
            save,
            Err(RepositoryError::UserNotFound("ghost".to_string()))
        );
    }

    #[tokio::test]
    async fn test_save_message_records_with_clock_timestamp() {
        // テスト項目: メッセージが Clock のタイムスタンプ付きで保存される
        // given (前提条件):
        let repo = InMemoryChatRepository::with_clock(Arc::new(FixedClock::new(1700000000000)));
        let chat_id = repo
            .create_chat("room", &["alice".to_string()])
            .await
            .unwrap();

        // when (操作):
        repo.save_message(chat_id, &username("alice"), &text("hello"))
            .await
            .unwrap();

        // then (期待する結果):
        let messages = repo.saved_messages(chat_id).await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].from, "alice");
        assert_eq!(messages[0].text, "hello");
        assert_eq!(messages[0].created_at, 1700000000000);
    }

    #[tokio::test]
    async fn test_get_user_chats_excludes_deleted() {
        // テスト項目: ユーザーのチャット一覧から削除済みが除外される
        // given (前提条件):
        let repo = InMemoryChatRepository::new();
        let members = vec!["alice".to_string(), "bob".to_string()];
        let keep = repo.create_chat("keep", &members).await.unwrap();
        let remove = repo.create_chat("remove", &members).await.unwrap();
        repo.delete_chat(remove).await.unwrap();

        // when (操作):
        let chats = repo.get_user_chats(&username("alice")).await.unwrap();

        // then (期待する結果):
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].id, keep.value());
        assert_eq!(chats[0].name, "keep");
        assert_eq!(chats[0].usernames, members);
    }

    #[tokio::test]
    async fn test_get_user_chats_for_unknown_user_is_empty() {
        // テスト項目: どのチャットにも属さないユーザーの一覧は空
        // given (前提条件):
        let repo = InMemoryChatRepository::new();
        repo.create_chat("room", &["alice".to_string()])
            .await
            .unwrap();

        // when (操作):
        let chats = repo.get_user_chats(&username("nobody")).await.unwrap();

        // then (期待する結果):
        assert!(chats.is_empty());
    }
}
