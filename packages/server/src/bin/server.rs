//! Chat backend server with per-room fan-out.
//!
//! Persists messages and pushes them to every connection attached to the
//! same chat room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin idobata-server
//! cargo run --bin idobata-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use idobata_server::{
    config::Config,
    domain::ChatRepository,
    infrastructure::{
        auth::{AccessChecker, AllowAllChecker, HttpAccessChecker},
        registry::ChatRegistry,
        repository::{InMemoryChatRepository, PgChatRepository},
    },
    ui::Server,
    usecase::{
        ConnectChatUseCase, CreateChatUseCase, DeleteChatUseCase, DisconnectChatUseCase,
        GetUserChatsUseCase, SendMessageUseCase,
    },
};
use idobata_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "idobata-server")]
#[command(about = "Chat backend server with per-room fan-out", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let config = Config::from_env();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. AccessChecker
    // 3. ChatRegistry
    // 4. UseCases
    // 5. Server

    // 1. Create Repository (Postgres, or in-memory when DATABASE_URL is unset)
    let repository: Arc<dyn ChatRepository> = match &config.database_url {
        Some(url) => {
            let repository = match PgChatRepository::connect(url).await {
                Ok(repository) => repository,
                Err(e) => {
                    tracing::error!("Failed to connect to database: {}", e);
                    std::process::exit(1);
                }
            };
            tracing::info!("Connected to Postgres");
            Arc::new(repository)
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory store");
            Arc::new(InMemoryChatRepository::new())
        }
    };

    // 2. Create AccessChecker
    let access_checker: Arc<dyn AccessChecker> = match &config.auth_endpoint {
        Some(endpoint) => {
            tracing::info!("Auth checks via {}", endpoint);
            Arc::new(HttpAccessChecker::new(endpoint.clone()))
        }
        None => {
            tracing::info!("AUTH_ENDPOINT not set, allowing all calls");
            Arc::new(AllowAllChecker)
        }
    };

    // 3. Create ChatRegistry (per-room connection state and dispatchers)
    let registry = ChatRegistry::new();

    // 4. Create UseCases
    let create_chat_usecase = Arc::new(CreateChatUseCase::new(repository.clone()));
    let delete_chat_usecase = Arc::new(DeleteChatUseCase::new(repository.clone()));
    let get_user_chats_usecase = Arc::new(GetUserChatsUseCase::new(repository.clone()));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        repository.clone(),
        registry.clone(),
    ));
    let connect_chat_usecase = Arc::new(ConnectChatUseCase::new(
        repository.clone(),
        registry.clone(),
    ));
    let disconnect_chat_usecase = Arc::new(DisconnectChatUseCase::new(registry.clone()));

    // 5. Create and run the server
    let server = Server::new(
        create_chat_usecase,
        delete_chat_usecase,
        get_user_chats_usecase,
        send_message_usecase,
        connect_chat_usecase,
        disconnect_chat_usecase,
        access_checker,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
