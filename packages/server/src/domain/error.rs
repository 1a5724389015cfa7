//! ドメイン層のエラー定義

use thiserror::Error;

/// Value Object の不変条件違反
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// ユーザー名が空
    #[error("from can't be empty")]
    EmptyUsername,

    /// メッセージ本文が空
    #[error("message's text can't be empty")]
    EmptyMessageText,

    /// チャット名が空
    #[error("chat's name can't be empty")]
    EmptyChatName,
}

/// Repository 層のエラー
///
/// 存在しない・メンバーでないといった検証エラーと、
/// ストア自体の障害を区別します。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// チャットが存在しない（削除済みを含む）
    #[error("chat {0} doesn't exist")]
    ChatNotFound(i64),

    /// ユーザーが存在しない
    #[error("user {0} doesn't exist")]
    UserNotFound(String),

    /// ユーザーがチャットのメンバーでない
    #[error("user {username} not in chat {chat_id}")]
    NotAMember { username: String, chat_id: i64 },

    /// ストア障害（接続断・クエリ失敗など）
    #[error("storage error: {0}")]
    Storage(String),
}
