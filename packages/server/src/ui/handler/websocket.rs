//! WebSocket connection handlers.
//!
//! 接続ごとのライフサイクル: Pending（認証前）→ Admitted（レジストリ登録済み）
//! → Closed（削除済み、終端）。

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, Stream, StreamExt},
};
use serde::Deserialize;
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{AuthenticatedUser, ConnectionHandle, ConnectionId, Username},
    infrastructure::dto::websocket::{ClientMessage, ServerMessage},
    ui::state::AppState,
    usecase::{ConnectError, SendMessageError},
};

/// Cookie carrying the session token set by the login service
pub const SESSION_COOKIE: &str = "hiroba_session";

/// Sent to the author when a message could not be stored
const SEND_FAILED_NOTICE: &str = "Failed to send message";

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub token: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    let token = session_cookie(&headers).or(query.token);

    // Session Gate: 認証できない接続はレジストリに触れずに閉じる
    let user = match state.connect_user_usecase.execute(token).await {
        Ok(user) => user,
        Err(ConnectError::Unauthenticated) => {
            tracing::warn!("Rejecting WebSocket connection without an authenticated session");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    tracing::info!("Upgrading connection for '{}'", user.username);
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user)))
}

/// Extract the session token from the `Cookie` header.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: broadcasts queued for
/// this connection are written to its socket in order.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = sender.send(Message::Text(msg.into())).await {
                tracing::debug!("Failed to write to socket: {}", e);
                break;
            }
        }
    })
}

/// Spawns a task that reads inbound frames until the peer closes or errors.
///
/// `stop` ends the loop between frames, so a message that is already being
/// handled is persisted and broadcast before the task returns.
fn receiver_loop<S>(
    mut receiver: S,
    state: Arc<AppState>,
    username: Username,
    own_handle: ConnectionHandle,
    mut stop: oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()>
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                _ = &mut stop => break,
                msg = receiver.next() => msg,
            };
            let Some(msg) = msg else {
                break;
            };

            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error from '{}': {}", username, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_text(&state, &username, &own_handle, text.as_str()).await;
                }
                Message::Binary(data) => {
                    tracing::debug!(
                        "Ignoring binary frame ({} bytes) from '{}'",
                        data.len(),
                        username
                    );
                }
                Message::Close(_) => {
                    tracing::info!("'{}' requested close", username);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    })
}

/// Handle one inbound text frame. Failures never close the connection.
async fn handle_text(
    state: &AppState,
    username: &Username,
    own_handle: &ConnectionHandle,
    text: &str,
) {
    let message = match ClientMessage::parse(text) {
        Ok(ClientMessage::ChatMessage { message }) => message,
        Err(e) => {
            tracing::warn!("Dropping malformed payload from '{}': {}", username, e);
            return;
        }
    };

    match state
        .send_message_usecase
        .execute(username.clone(), message)
        .await
    {
        Ok(_) => {}
        Err(SendMessageError::MalformedPayload(e)) => {
            tracing::warn!("Dropping invalid chat message from '{}': {}", username, e);
        }
        Err(SendMessageError::PersistenceFailure(_)) => {
            notify_error(own_handle, SEND_FAILED_NOTICE.to_string());
        }
    }
}

/// Report a failure to this connection only.
fn notify_error(handle: &ConnectionHandle, message: String) {
    let payload = match serde_json::to_string(&ServerMessage::Error { message }) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!("Failed to serialize error payload: {}", e);
            return;
        }
    };
    if let Err(e) = handle.send(payload) {
        tracing::debug!("Could not report error: {}", e);
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, user: AuthenticatedUser) {
    let (sender, receiver) = socket.split();

    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = ConnectionId::generate();
    let handle = ConnectionHandle::new(connection_id, tx);

    // The receiver loop keeps its own clone of the handle, so the queue stays
    // open even after a takeover drops the registry's copy.
    let own_handle = handle.clone();

    // Pending → Admitted
    state.connect_user_usecase.admit(&user, handle).await;

    let (stop_tx, stop_rx) = oneshot::channel();
    let mut send_task = pusher_loop(rx, sender);
    let mut recv_task = receiver_loop(
        receiver,
        state.clone(),
        user.username.clone(),
        own_handle,
        stop_rx,
    );

    // The pusher may be aborted outright; the receiver finishes its current frame first
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => {
            stop_tx.send(()).ok();
            if let Err(e) = recv_task.await {
                tracing::warn!("Receiver task for '{}' failed: {}", user.username, e);
            }
        }
    };

    // Admitted → Closed
    state
        .disconnect_user_usecase
        .execute(&user.username, connection_id)
        .await;
}
