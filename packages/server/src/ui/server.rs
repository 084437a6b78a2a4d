//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::{
    ConnectUserUseCase, CreateSessionUseCase, DisconnectUserUseCase, EndSessionUseCase,
    GetOnlineUsersUseCase, GetRecentMessagesUseCase, SendMessageUseCase,
};

use super::{
    handler::{
        http::{
            create_session, end_session, get_online_users, get_recent_messages, health_check,
        },
        websocket::websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_user_usecase,
///     disconnect_user_usecase,
///     send_message_usecase,
///     get_recent_messages_usecase,
///     get_online_users_usecase,
///     create_session_usecase,
///     end_session_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        connect_user_usecase: Arc<ConnectUserUseCase>,
        disconnect_user_usecase: Arc<DisconnectUserUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        get_recent_messages_usecase: Arc<GetRecentMessagesUseCase>,
        get_online_users_usecase: Arc<GetOnlineUsersUseCase>,
        create_session_usecase: Arc<CreateSessionUseCase>,
        end_session_usecase: Arc<EndSessionUseCase>,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                connect_user_usecase,
                disconnect_user_usecase,
                send_message_usecase,
                get_recent_messages_usecase,
                get_online_users_usecase,
                create_session_usecase,
                end_session_usecase,
            }),
        }
    }

    /// Build the axum router
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/messages", get(get_recent_messages))
            .route("/api/online-users", get(get_online_users))
            .route(
                "/api/sessions",
                post(create_session).delete(end_session),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the WebSocket chat server
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
        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Serve on an already bound listener until the process is stopped.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        axum::serve(listener, self.router()).await
    }
}
