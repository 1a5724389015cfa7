//! ConnectChat ユースケース（接続ライフサイクルの開始）

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::domain::{ChatId, ChatRepository, OutboundMessage, Username};
use crate::infrastructure::registry::{ChatRegistry, ConnectionHandle, OUTBOX_CAPACITY};
use crate::usecase::error::ConnectChatError;

/// 確立された 1 接続
///
/// トランスポート側（WebSocket ハンドラ）はこの構造体を受け取り、
/// `outbox` から配送メッセージを読み、`cancelled` で eviction を検知します。
/// 接続終了時は `chat_id` / `username` / `handle` を使って
/// DisconnectChatUseCase を呼びます。
pub struct ChatConnection {
    pub chat_id: ChatId,
    pub username: Username,
    /// Dispatcher からの配送を受け取る受信側（容量制限付き）
    pub outbox: mpsc::Receiver<OutboundMessage>,
    /// Registry 側からの eviction 通知（置き換え・配送失敗）
    pub cancelled: CancellationToken,
    /// Registry に登録したハンドル（leave 時の同一性判定に使う）
    pub handle: ConnectionHandle,
}

/// ConnectChat ユースケース
///
/// 接続の検証と Registry への登録だけを行います。部屋の作成・破棄は
/// Registry が join / leave の中で自動的に行うため、ここには現れません。
pub struct ConnectChatUseCase {
    repository: Arc<dyn ChatRepository>,
    registry: Arc<ChatRegistry>,
}

impl ConnectChatUseCase {
    /// 新しい ConnectChatUseCase を作成
    pub fn new(repository: Arc<dyn ChatRepository>, registry: Arc<ChatRegistry>) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// チャットへの接続を確立する
    ///
    /// チャットの存在とメンバーシップをストアで検証してから、
    /// 接続を Registry に登録します。検証に失敗した場合、
    /// Registry の状態は一切変更されません。
    pub async fn execute(
        &self,
        chat_id: ChatId,
        username: Username,
    ) -> Result<ChatConnection, ConnectChatError> {
        self.repository.check_chat(chat_id, &username).await?;

        let (outbox_tx, outbox_rx) = mpsc::channel(OUTBOX_CAPACITY);
        let cancelled = CancellationToken::new();
        let handle = ConnectionHandle::new(outbox_tx, cancelled.clone());

        self.registry
            .join(chat_id, username.clone(), handle.clone())
            .await;

        Ok(ChatConnection {
            chat_id,
            username,
            outbox: outbox_rx,
            cancelled,
            handle,
        })
    }
}
