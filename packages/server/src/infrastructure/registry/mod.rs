//! Chat Registry 実装
//!
//! プロセス内で生きている部屋（= 1 接続以上が attach しているチャット）の
//! 状態を管理します。部屋ごとに接続集合と容量制限付きの保留キューを持ち、
//! 最初の join で部屋と Dispatcher タスクを作成し、最後の leave で破棄します。
//!
//! ## 不変条件
//!
//! - 部屋の状態は接続集合が非空である間だけ存在する
//! - 1 つのユーザー名は 1 部屋につき高々 1 接続（後からの join が置き換える）
//! - 部屋の membership を変更するのはこの Registry だけ
//!
//! ## Dispatcher
//!
//! 部屋ごとに 1 つのタスクが保留キューを単独で消費し、受け取った順に
//! 全接続へ配送します（部屋内 FIFO）。配送に失敗した接続（outbox が
//! 閉じている・満杯）は cancellation token を介して evict され、
//! 他の接続への配送は続行します。
//! 部屋の破棄でキューの送信側が drop されるとループは終了し、
//! 未配送のメッセージは破棄されます。

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use tokio::sync::{RwLock, mpsc};
use tokio_util::sync::CancellationToken;

use crate::domain::{ChatId, OutboundMessage, Username};

/// 部屋ごとの保留キューの容量
///
/// キューが満杯のとき送信側はブロックせずに失敗します。
pub const PENDING_MESSAGE_CAPACITY: usize = 100;

/// 接続ごとの outbox の容量
///
/// 受信が滞って満杯になった接続への配送は失敗として扱われ、
/// その接続は evict されます。遅いクライアントがサーバ側に
/// 無制限にバッファを積ませることはできません。
pub const OUTBOX_CAPACITY: usize = 100;

/// 1 ユーザー接続への配送ハンドル
///
/// 接続ごとの送信チャンネル（outbox）と、切断・eviction を伝える
/// cancellation token の組。Dispatcher と接続のライフサイクル処理の
/// 双方に登録時に渡され、相互参照なしで eviction を連絡できます。
#[derive(Clone)]
pub struct ConnectionHandle {
    outbox: mpsc::Sender<OutboundMessage>,
    cancel: CancellationToken,
}

impl ConnectionHandle {
    /// 新しい ConnectionHandle を作成
    pub fn new(outbox: mpsc::Sender<OutboundMessage>, cancel: CancellationToken) -> Self {
        Self { outbox, cancel }
    }

    /// メッセージを接続の outbox へ配送する（ブロックしない）
    ///
    /// 受信側が drop されている（トランスポートが閉じた）場合と、
    /// outbox が満杯の場合は Err。
    fn deliver(&self, message: OutboundMessage) -> Result<(), ()> {
        self.outbox.try_send(message).map_err(|_| ())
    }

    /// この接続を evict する（ライフサイクル側のループが leave を実行する）
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// 同一の登録かどうか（outbox チャンネルの同一性で判定）
    fn same_registration(&self, other: &ConnectionHandle) -> bool {
        self.outbox.same_channel(&other.outbox)
    }
}

/// 生きている部屋の状態
struct RoomState {
    /// ユーザー名 → 接続ハンドル
    connections: HashMap<Username, ConnectionHandle>,
    /// 保留キューの送信側（部屋の破棄とともに drop される）
    pending_tx: mpsc::Sender<OutboundMessage>,
}

/// Chat Registry
///
/// プロセス全体で共有される可変状態はこの構造体の `rooms` だけで、
/// 全ての変更は `join` / `leave` を通じて排他ロックの下で行われます。
/// グローバル変数ではなく明示的に注入されるため、テストごとに
/// 独立したインスタンスを作成できます。
pub struct ChatRegistry {
    rooms: RwLock<HashMap<ChatId, RoomState>>,
    queue_capacity: usize,
    /// Dispatcher タスクへ渡す自己参照（タスクが Registry を延命しないため Weak）
    weak_self: Weak<ChatRegistry>,
}

impl ChatRegistry {
    /// 新しい ChatRegistry を作成
    pub fn new() -> Arc<Self> {
        Self::with_capacity(PENDING_MESSAGE_CAPACITY)
    }

    /// 保留キューの容量を指定して作成（テスト用途）
    pub fn with_capacity(queue_capacity: usize) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            rooms: RwLock::new(HashMap::new()),
            queue_capacity,
            weak_self: weak_self.clone(),
        })
    }

    /// 接続を部屋に登録する
    ///
    /// 部屋が存在しなければ接続集合と保留キューを作成し、Dispatcher を
    /// 起動します。同じユーザー名の既存の登録は置き換えられ、
    /// 置き換えられた側の接続は evict されます。
    pub async fn join(&self, chat_id: ChatId, username: Username, handle: ConnectionHandle) {
        let mut rooms = self.rooms.write().await;
        let room = rooms.entry(chat_id).or_insert_with(|| {
            let (pending_tx, pending_rx) = mpsc::channel(self.queue_capacity);
            self.spawn_dispatcher(chat_id, pending_rx);
            tracing::info!(%chat_id, "room created");
            RoomState {
                connections: HashMap::new(),
                pending_tx,
            }
        });

        if let Some(replaced) = room.connections.insert(username.clone(), handle) {
            tracing::warn!(%chat_id, %username, "replaced existing registration");
            replaced.cancel();
        }
        tracing::info!(%chat_id, %username, "connection joined");
    }

    /// 接続を部屋から登録解除する
    ///
    /// `handle` が現在登録されているものと同一の場合のみ削除します
    /// （置き換え後に旧接続の終了処理が新しい登録を壊さないため）。
    /// 接続集合が空になった部屋はキューごと破棄され、Dispatcher は停止します。
    pub async fn leave(&self, chat_id: ChatId, username: &Username, handle: &ConnectionHandle) {
        let mut rooms = self.rooms.write().await;
        let Some(room) = rooms.get_mut(&chat_id) else {
            return;
        };

        match room.connections.get(username) {
            Some(current) if current.same_registration(handle) => {
                room.connections.remove(username);
                tracing::info!(%chat_id, %username, "connection left");
            }
            _ => return,
        }

        if room.connections.is_empty() {
            rooms.remove(&chat_id);
            tracing::info!(%chat_id, "room removed (last connection left)");
        }
    }

    /// 部屋の保留キューの送信側を取得する
    ///
    /// 部屋が存在しない（誰も attach していない）場合は None。
    pub async fn pending_sender(&self, chat_id: ChatId) -> Option<mpsc::Sender<OutboundMessage>> {
        let rooms = self.rooms.read().await;
        rooms.get(&chat_id).map(|room| room.pending_tx.clone())
    }

    /// ユーザーが部屋に接続中かどうか
    pub async fn is_connected(&self, chat_id: ChatId, username: &Username) -> bool {
        let rooms = self.rooms.read().await;
        rooms
            .get(&chat_id)
            .is_some_and(|room| room.connections.contains_key(username))
    }

    /// 生きている部屋の数
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// 部屋に attach している接続の数（部屋が無ければ 0）
    pub async fn connection_count(&self, chat_id: ChatId) -> usize {
        let rooms = self.rooms.read().await;
        rooms.get(&chat_id).map_or(0, |room| room.connections.len())
    }

    /// 部屋の Dispatcher タスクを起動する
    ///
    /// キューの唯一の消費者。受信側が閉じる（部屋が破棄される）まで、
    /// メッセージごとに共有ロックの下で接続集合のスナップショットを取り、
    /// 順番に配送します。Registry への参照は Weak で持ち、
    /// Registry 自体が drop された場合もタスクは終了します。
    fn spawn_dispatcher(&self, chat_id: ChatId, mut pending_rx: mpsc::Receiver<OutboundMessage>) {
        let registry = self.weak_self.clone();
        tokio::spawn(async move {
            while let Some(message) = pending_rx.recv().await {
                let Some(registry) = registry.upgrade() else {
                    break;
                };

                let snapshot: Vec<(Username, ConnectionHandle)> = {
                    let rooms = registry.rooms.read().await;
                    match rooms.get(&chat_id) {
                        Some(room) => room
                            .connections
                            .iter()
                            .map(|(username, handle)| (username.clone(), handle.clone()))
                            .collect(),
                        // enqueue と配送の間に部屋が破棄された
                        None => continue,
                    }
                };

                for (username, handle) in snapshot {
                    if handle.deliver(message.clone()).is_err() {
                        tracing::warn!(
                            %chat_id,
                            %username,
                            "delivery failed, evicting connection"
                        );
                        handle.cancel();
                    }
                }
            }
            tracing::debug!(%chat_id, "dispatcher stopped");
        });
    }
}
