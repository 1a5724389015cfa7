//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::{ChatId, RepositoryError, Username},
    infrastructure::dto::http::{
        ChatDto, CreateChatRequest, CreateChatResponse, ErrorResponse, GetUserChatsResponse,
        SendMessageRequest,
    },
    ui::state::AppState,
    usecase::{CreateChatError, DeleteChatError, GetUserChatsError, SendMessageError},
};

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn error_reply(status: StatusCode, err: impl std::fmt::Display) -> ErrorReply {
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::ChatNotFound(_) | RepositoryError::UserNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        RepositoryError::NotAMember { .. } => StatusCode::FORBIDDEN,
        RepositoryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Create a new chat
pub async fn create_chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateChatRequest>,
) -> Result<(StatusCode, Json<CreateChatResponse>), ErrorReply> {
    match state
        .create_chat_usecase
        .execute(request.name, request.usernames)
        .await
    {
        Ok(chat_id) => Ok((
            StatusCode::CREATED,
            Json(CreateChatResponse {
                id: chat_id.value(),
            }),
        )),
        Err(err @ (CreateChatError::EmptyChatName | CreateChatError::EmptyUsernames)) => {
            Err(error_reply(StatusCode::BAD_REQUEST, err))
        }
        Err(CreateChatError::Repository(err)) => Err(error_reply(repository_status(&err), err)),
    }
}

/// Delete a chat by ID
pub async fn delete_chat(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<i64>,
) -> Result<StatusCode, ErrorReply> {
    match state.delete_chat_usecase.execute(ChatId::new(chat_id)).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(DeleteChatError::Repository(err)) => Err(error_reply(repository_status(&err), err)),
    }
}

/// Get the list of chats a user belongs to
pub async fn get_user_chats(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<GetUserChatsResponse>, ErrorReply> {
    let username =
        Username::new(username).map_err(|err| error_reply(StatusCode::BAD_REQUEST, err))?;

    match state.get_user_chats_usecase.execute(&username).await {
        Ok(chats) => Ok(Json(GetUserChatsResponse {
            chats: chats.into_iter().map(ChatDto::from).collect(),
        })),
        Err(GetUserChatsError::Repository(err)) => Err(error_reply(repository_status(&err), err)),
    }
}

/// Send a message to a chat
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<i64>,
    Json(request): Json<SendMessageRequest>,
) -> Result<StatusCode, ErrorReply> {
    match state
        .send_message_usecase
        .execute(ChatId::new(chat_id), request.from, request.text)
        .await
    {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(err @ SendMessageError::Validation(_)) => {
            Err(error_reply(StatusCode::BAD_REQUEST, err))
        }
        Err(err @ SendMessageError::ChatNotConnected(_)) => {
            Err(error_reply(StatusCode::NOT_FOUND, err))
        }
        Err(err @ SendMessageError::SenderNotConnected(_)) => {
            Err(error_reply(StatusCode::FORBIDDEN, err))
        }
        Err(err @ SendMessageError::QueueFull(_)) => {
            Err(error_reply(StatusCode::SERVICE_UNAVAILABLE, err))
        }
        Err(SendMessageError::Repository(err)) => Err(error_reply(repository_status(&err), err)),
    }
}
