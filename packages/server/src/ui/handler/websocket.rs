//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;

use crate::{
    domain::{ChatId, RepositoryError, Username},
    infrastructure::dto::{http::ErrorResponse, websocket::ChatFrame},
    ui::state::AppState,
    usecase::{ConnectChatError, connect_chat::ChatConnection},
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub username: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<i64>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    // Convert String -> Username (Domain Model)
    let username = Username::new(query.username).map_err(|err| {
        tracing::warn!("Invalid username in connect request");
        reply(StatusCode::BAD_REQUEST, err)
    })?;

    // Use ConnectChatUseCase to validate and register the connection
    // (the room is created inside the registry on first join)
    match state
        .connect_chat_usecase
        .execute(ChatId::new(chat_id), username)
        .await
    {
        Ok(connection) => {
            // upgrade のハンドシェイクが失敗すると成功側のコールバックは
            // 呼ばれないため、登録済みの接続をこの経路でも必ず解除する
            let chat_id = connection.chat_id;
            let username = connection.username.clone();
            let handle = connection.handle.clone();
            let cleanup_state = state.clone();
            let ws = ws.on_failed_upgrade(move |error| {
                tracing::warn!(%chat_id, %username, "upgrade failed: {}", error);
                tokio::spawn(async move {
                    cleanup_state
                        .disconnect_chat_usecase
                        .execute(chat_id, &username, &handle)
                        .await;
                });
            });
            Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connection)))
        }
        Err(ConnectChatError::Repository(err)) => {
            tracing::warn!(chat_id, error = %err, "connect rejected");
            let status = match &err {
                RepositoryError::ChatNotFound(_) | RepositoryError::UserNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                RepositoryError::NotAMember { .. } => StatusCode::FORBIDDEN,
                RepositoryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err(reply(status, err))
        }
    }
}

fn reply(status: StatusCode, err: impl std::fmt::Display) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection: ChatConnection) {
    let ChatConnection {
        chat_id,
        username,
        mut outbox,
        cancelled,
        handle,
    } = connection;

    tracing::info!(%chat_id, %username, "WebSocket connection established");
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            // Dispatcher からの配送をクライアントへ push する
            message = outbox.recv() => {
                let Some(message) = message else {
                    break;
                };
                let frame = ChatFrame::from(message);
                let json = serde_json::to_string(&frame).unwrap();
                if sender.send(Message::Text(json.into())).await.is_err() {
                    tracing::info!(%chat_id, %username, "transport closed while pushing");
                    break;
                }
            }

            // Registry 側からの eviction（置き換え・配送失敗）
            () = cancelled.cancelled() => {
                tracing::info!(%chat_id, %username, "connection evicted");
                let _ = sender.send(Message::Close(None)).await;
                break;
            }

            // クライアント側の切断検知（送信は HTTP 経由のみ）
            inbound = receiver.next() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!(%chat_id, %username, "client closed connection");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(%chat_id, %username, "WebSocket error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    // 終了経路に関わらず登録解除は必ずここを通る
    state
        .disconnect_chat_usecase
        .execute(chat_id, &username, &handle)
        .await;
    tracing::info!(%chat_id, %username, "connection cleaned up");
}
