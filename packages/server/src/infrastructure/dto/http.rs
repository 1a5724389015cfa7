//! HTTP API request/response DTOs

use serde::{Deserialize, Serialize};

/// チャット作成リクエスト
#[derive(Debug, Deserialize)]
pub struct CreateChatRequest {
    pub name: String,
    #[serde(default)]
    pub usernames: Vec<String>,
}

/// チャット作成レスポンス
#[derive(Debug, Serialize)]
pub struct CreateChatResponse {
    pub id: i64,
}

/// メッセージ送信リクエスト
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub from: String,
    pub text: String,
}

/// チャット情報
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ChatDto {
    pub id: i64,
    pub name: String,
    pub usernames: Vec<String>,
}

/// ユーザーのチャット一覧レスポンス
#[derive(Debug, Serialize)]
pub struct GetUserChatsResponse {
    pub chats: Vec<ChatDto>,
}

/// エラーレスポンス
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
