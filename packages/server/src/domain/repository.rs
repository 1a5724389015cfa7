//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Chat, ChatId, MessageText, RepositoryError, Username};

/// Chat Repository trait
///
/// 複数ステートメントから成る操作は、実装側が 1 つのトランザクション
/// （read committed）として実行します。部分的な書き込みは残りません。
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// チャットを作成し、メンバーを登録して、採番された ID を返す
    ///
    /// 存在しないユーザー名は新規ユーザーとして登録されます。
    async fn create_chat(
        &self,
        name: &str,
        usernames: &[String],
    ) -> Result<ChatId, RepositoryError>;

    /// チャットを削除する（論理削除）
    ///
    /// 存在しないチャットの削除は `ChatNotFound` になります。
    async fn delete_chat(&self, chat_id: ChatId) -> Result<(), RepositoryError>;

    /// ユーザーが属するチャットの一覧を取得する（削除済みは除外）
    async fn get_user_chats(&self, username: &Username) -> Result<Vec<Chat>, RepositoryError>;

    /// メッセージを永続化する
    ///
    /// チャットの存在・ユーザーの存在・メンバーシップを
    /// 同一トランザクション内で再検証してから保存します。
    async fn save_message(
        &self,
        chat_id: ChatId,
        from: &Username,
        text: &MessageText,
    ) -> Result<(), RepositoryError>;

    /// 接続前の検証: チャットが存在し（削除されておらず）、
    /// ユーザーがそのメンバーであることを確認する
    async fn check_chat(
        &self,
        chat_id: ChatId,
        username: &Username,
    ) -> Result<(), RepositoryError>;
}
