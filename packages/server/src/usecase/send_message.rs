//! SendMessage ユースケース（送信オーケストレーション）

use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;

use crate::domain::{ChatId, ChatRepository, MessageText, OutboundMessage, Username};
use crate::infrastructure::registry::ChatRegistry;
use crate::usecase::error::SendMessageError;

/// SendMessage ユースケース
///
/// 1 回の送信は以下の順で処理されます。
///
/// 1. 入力の検証（送信者名・本文が空でないこと）
/// 2. 部屋が生きていること（1 接続以上が attach している）の確認
/// 3. 送信者自身がその部屋に接続していることの確認
/// 4. ストアへの永続化
/// 5. 部屋の保留キューへの enqueue（ブロックしない）
///
/// 永続化と enqueue はアトミックではありません。永続化の直後に部屋が
/// 破棄された場合、メッセージは保存されるが配送されないことがあります
/// （未配送メッセージは破棄する、という部屋破棄時の方針と同じ扱い）。
pub struct SendMessageUseCase {
    repository: Arc<dyn ChatRepository>,
    registry: Arc<ChatRegistry>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(repository: Arc<dyn ChatRepository>, registry: Arc<ChatRegistry>) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// メッセージを永続化し、部屋の保留キューへ enqueue する
    pub async fn execute(
        &self,
        chat_id: ChatId,
        from: String,
        text: String,
    ) -> Result<(), SendMessageError> {
        let from = Username::new(from)?;
        let text = MessageText::new(text)?;

        let Some(sender) = self.registry.pending_sender(chat_id).await else {
            return Err(SendMessageError::ChatNotConnected(chat_id.value()));
        };
        if !self.registry.is_connected(chat_id, &from).await {
            return Err(SendMessageError::SenderNotConnected(
                from.as_str().to_string(),
            ));
        }

        self.repository.save_message(chat_id, &from, &text).await?;

        let message = OutboundMessage { from, text };
        match sender.try_send(message) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(SendMessageError::QueueFull(chat_id.value())),
            // 永続化との間に部屋が破棄された。保存は済んでいるので
            // 送信自体は成功として扱う。
            Err(TrySendError::Closed(_)) => {
                tracing::warn!(%chat_id, "room torn down before enqueue, message dropped");
                Ok(())
            }
        }
    }
}
