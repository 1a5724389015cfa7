//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{DomainError, RepositoryError};

/// チャット作成のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CreateChatError {
    /// チャット名が空
    #[error("chat's name can't be empty")]
    EmptyChatName,

    /// メンバーが 1 人も指定されていない
    #[error("chat's usernames can't be empty")]
    EmptyUsernames,

    /// ストアのエラー
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// チャット削除のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeleteChatError {
    /// ストアのエラー（存在しないチャットを含む）
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// チャット一覧取得のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GetUserChatsError {
    /// ストアのエラー
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// チャット接続のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectChatError {
    /// 接続前の検証に失敗（チャット不在・非メンバーなど）
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// メッセージ送信のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// 必須フィールドが空
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// 部屋がまだ作られていない（誰も接続していない）
    #[error("chat's {0} connection not exist. connect to create it")]
    ChatNotConnected(i64),

    /// 送信者自身がチャットに接続していない
    #[error("user {0} is not connected to chat. connect to chat")]
    SenderNotConnected(String),

    /// 永続化の失敗（トランザクションは巻き戻り、部分状態は残らない）
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// 部屋の保留キューが満杯（ブロックせずに失敗する）
    #[error("chat's {0} pending queue is full")]
    QueueFull(i64),
}
