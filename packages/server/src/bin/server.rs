//! Single-room WebSocket chat server with presence tracking.
//!
//! Authenticated users connect to `/ws`, every chat message is persisted and
//! broadcast to everyone online, and joins/leaves carry the full roster.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;
use hiroba_server::{
    infrastructure::{
        message_pusher::WebSocketBroadcaster,
        registry::InMemoryConnectionRegistry,
        repository::{InMemoryMessageRepository, InMemorySessionStore},
    },
    ui::Server,
    usecase::{
        ConnectUserUseCase, CreateSessionUseCase, DisconnectUserUseCase, EndSessionUseCase,
        GetOnlineUsersUseCase, GetRecentMessagesUseCase, PresenceLock, SendMessageUseCase,
    },
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Single-room WebSocket chat server with presence", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Number of messages returned by the history endpoint when no limit is given
    #[arg(long, default_value = "50")]
    history_limit: usize,

    /// Number of messages kept in memory (older ones are dropped)
    #[arg(long, default_value = "10000")]
    history_retention: usize,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "debug")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_CRATE_NAME"), env!("CARGO_BIN_NAME"), &args.log_level);

    // Initialize dependencies in order:
    // 1. Registry / Persistence / Sessions
    // 2. Broadcaster
    // 3. UseCases
    // 4. Server

    // 1. In-memory adapters
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let repository = Arc::new(InMemoryMessageRepository::with_retention(
        args.history_retention,
    ));
    let sessions = Arc::new(InMemorySessionStore::new());
    let clock = Arc::new(SystemClock);

    // 2. Broadcast Engine over the registry
    let broadcaster = Arc::new(WebSocketBroadcaster::new(registry.clone()));

    // 3. Create UseCases
    let presence = Arc::new(PresenceLock::new());
    let connect_user_usecase = Arc::new(ConnectUserUseCase::new(
        sessions.clone(),
        registry.clone(),
        broadcaster.clone(),
        clock.clone(),
        presence.clone(),
    ));
    let disconnect_user_usecase = Arc::new(DisconnectUserUseCase::new(
        registry.clone(),
        broadcaster.clone(),
        clock.clone(),
        presence,
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        repository.clone(),
        broadcaster,
        clock,
    ));
    let get_recent_messages_usecase = Arc::new(GetRecentMessagesUseCase::new(
        repository,
        args.history_limit,
    ));
    let get_online_users_usecase = Arc::new(GetOnlineUsersUseCase::new(registry));
    let create_session_usecase = Arc::new(CreateSessionUseCase::new(sessions.clone()));
    let end_session_usecase = Arc::new(EndSessionUseCase::new(sessions));

    // 4. Create and run the server
    let server = Server::new(
        connect_user_usecase,
        disconnect_user_usecase,
        send_message_usecase,
        get_recent_messages_usecase,
        get_online_users_usecase,
        create_session_usecase,
        end_session_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
