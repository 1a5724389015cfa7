//! エンティティ定義

use super::value_object::{MessageText, Username};

/// チャット（永続ストア上の 1 つの会話）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    /// ストアが採番したチャット ID
    pub id: i64,
    /// チャット名
    pub name: String,
    /// チャットに属するユーザー名のリスト
    pub usernames: Vec<String>,
}

/// ファンアウト対象のメッセージ
///
/// 永続化が成功した後に部屋の保留キューへ積まれ、
/// Dispatcher が接続中の全ユーザーへ配送します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// 送信者のユーザー名
    pub from: Username,
    /// メッセージ本文
    pub text: MessageText,
}
