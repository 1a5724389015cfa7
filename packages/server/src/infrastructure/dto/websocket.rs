//! WebSocket frame DTOs

use serde::{Deserialize, Serialize};

/// ストリームで配送されるチャットメッセージフレーム
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatFrame {
    pub from: String,
    pub text: String,
}
