//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::infrastructure::auth::AccessChecker;
use crate::usecase::{
    ConnectChatUseCase, CreateChatUseCase, DeleteChatUseCase, DisconnectChatUseCase,
    GetUserChatsUseCase, SendMessageUseCase,
};

use super::{
    handler::{
        create_chat, delete_chat, get_user_chats, health_check, send_message, websocket_handler,
    },
    middleware::authorize,
    signal::shutdown_signal,
    state::AppState,
};

/// Chat backend server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     create_chat_usecase,
///     delete_chat_usecase,
///     get_user_chats_usecase,
///     send_message_usecase,
///     connect_chat_usecase,
///     disconnect_chat_usecase,
///     access_checker,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// CreateChatUseCase（チャット作成のユースケース）
    create_chat_usecase: Arc<CreateChatUseCase>,
    /// DeleteChatUseCase（チャット削除のユースケース）
    delete_chat_usecase: Arc<DeleteChatUseCase>,
    /// GetUserChatsUseCase（チャット一覧取得のユースケース）
    get_user_chats_usecase: Arc<GetUserChatsUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    send_message_usecase: Arc<SendMessageUseCase>,
    /// ConnectChatUseCase（チャット接続のユースケース）
    connect_chat_usecase: Arc<ConnectChatUseCase>,
    /// DisconnectChatUseCase（チャット切断のユースケース）
    disconnect_chat_usecase: Arc<DisconnectChatUseCase>,
    /// AccessChecker（認可チェックの抽象化）
    access_checker: Arc<dyn AccessChecker>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        create_chat_usecase: Arc<CreateChatUseCase>,
        delete_chat_usecase: Arc<DeleteChatUseCase>,
        get_user_chats_usecase: Arc<GetUserChatsUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        connect_chat_usecase: Arc<ConnectChatUseCase>,
        disconnect_chat_usecase: Arc<DisconnectChatUseCase>,
        access_checker: Arc<dyn AccessChecker>,
    ) -> Self {
        Self {
            create_chat_usecase,
            delete_chat_usecase,
            get_user_chats_usecase,
            send_message_usecase,
            connect_chat_usecase,
            disconnect_chat_usecase,
            access_checker,
        }
    }

    /// Build the application router (exposed for in-process scenario tests)
    pub fn router(self) -> Router {
        let app_state = Arc::new(AppState {
            create_chat_usecase: self.create_chat_usecase,
            delete_chat_usecase: self.delete_chat_usecase,
            get_user_chats_usecase: self.get_user_chats_usecase,
            send_message_usecase: self.send_message_usecase,
            connect_chat_usecase: self.connect_chat_usecase,
            disconnect_chat_usecase: self.disconnect_chat_usecase,
            access_checker: self.access_checker,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws/chats/{chat_id}", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/chats", post(create_chat))
            .route("/api/chats/{chat_id}", delete(delete_chat))
            .route("/api/chats/{chat_id}/messages", post(send_message))
            .route("/api/users/{username}/chats", get(get_user_chats))
            .layer(middleware::from_fn_with_state(app_state.clone(), authorize))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the chat backend server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!("Chat backend listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws/chats/{{chat_id}}", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
