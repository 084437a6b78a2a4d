//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use hiroba_server::infrastructure::dto::websocket::{ClientMessage, ServerMessage};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, protocol::Message},
};

use crate::{
    api,
    domain::{upgrade_rejected, websocket_url},
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

/// Run one connected session: sign in, print history, then relay messages
/// until the connection drops or the input stream ends.
///
/// `token` is reused across reconnects; a new session is requested only when
/// it is `None`, and it is cleared again if the server no longer accepts it.
///
/// Returns `Ok(())` when the user quits.
pub async fn run_client_session(
    http: &reqwest::Client,
    base_url: &str,
    username: &str,
    history: usize,
    token: &mut Option<String>,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let reused = token.is_some();
    let session_token = match token.clone() {
        Some(existing) => existing,
        None => {
            let session = api::create_session(http, base_url, username).await?;
            tracing::debug!("Session issued for '{}'", session.username);
            *token = Some(session.token.clone());
            session.token
        }
    };

    if history > 0 {
        let messages = api::recent_messages(http, base_url, history).await?;
        print!("{}", MessageFormatter::format_history(&messages, username));
    }

    let url = websocket_url(base_url, &session_token)?;
    let (ws_stream, _response) = match connect_async(&url).await {
        Ok(result) => result,
        Err(WsError::Http(response)) if response.status().as_u16() == 401 => {
            *token = None;
            return Err(upgrade_rejected(username, reused));
        }
        Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
    };

    tracing::info!("Connected to chat server!");
    println!(
        "\nYou are '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
        username
    );

    let (mut write, mut read) = ws_stream.split();

    let current_user = username.to_string();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    print!("{}", render(&text, &current_user));
                    redisplay_prompt(&current_user);
                }
                Ok(Message::Close(_)) => {
                    return Err("server closed the connection".to_string());
                }
                Err(e) => return Err(e.to_string()),
                _ => {}
            }
        }
        Err("stream ended".to_string())
    });

    loop {
        tokio::select! {
            read_result = &mut read_task => {
                let reason = match read_result {
                    Ok(Err(reason)) => reason,
                    Ok(Ok(())) => "stream ended".to_string(),
                    Err(e) => e.to_string(),
                };
                return Err(ClientError::ConnectionLost(reason));
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    read_task.abort();
                    write.close().await.ok();
                    return Ok(());
                };

                let payload = ClientMessage::ChatMessage { message: line };
                let json = match serde_json::to_string(&payload) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!("Failed to serialize message: {}", e);
                        continue;
                    }
                };

                if let Err(e) = write.send(Message::Text(json.into())).await {
                    read_task.abort();
                    return Err(ClientError::ConnectionLost(e.to_string()));
                }
            }
        }
    }
}

/// Turn one server frame into display text.
fn render(text: &str, current_user: &str) -> String {
    match serde_json::from_str::<ServerMessage>(text) {
        Ok(ServerMessage::ChatMessage {
            message,
            sender,
            timestamp,
        }) => MessageFormatter::format_chat_message(&sender, &message, &timestamp, current_user),
        Ok(ServerMessage::UserConnected {
            message,
            timestamp,
            online_users,
            ..
        }) => MessageFormatter::format_user_connected(
            &message,
            &timestamp,
            &online_users,
            current_user,
        ),
        Ok(ServerMessage::UserDisconnected {
            username,
            timestamp,
            online_users,
        }) => MessageFormatter::format_user_disconnected(
            &username,
            &timestamp,
            &online_users,
            current_user,
        ),
        Ok(ServerMessage::Error { message }) => MessageFormatter::format_error(&message),
        Err(_) => {
            tracing::debug!("Unknown message: {}", text);
            MessageFormatter::format_raw_message(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_chat_message() {
        // テスト項目: chatMessage がチャット表示に変換される
        // given (前提条件):
        let text = r#"{"type":"chatMessage","message":"hi","sender":"alice","timestamp":"2024-01-01T00:00:00.000Z"}"#;

        // when (操作):
        let result = render(text, "bob");

        // then (期待する結果):
        assert!(result.contains("@alice: hi"));
    }

    #[test]
    fn test_render_user_connected() {
        // テスト項目: userConnected が参加通知に変換される
        // given (前提条件):
        let text = r#"{"type":"userConnected","username":"alice","message":"User alice has joined the chat!","timestamp":"2024-01-01T00:00:00.000Z","onlineUsers":["alice","bob"]}"#;

        // when (操作):
        let result = render(text, "bob");

        // then (期待する結果):
        assert!(result.contains("+ User alice has joined the chat!"));
        assert!(result.contains("Online (2): alice, bob (me)"));
    }

    #[test]
    fn test_render_user_disconnected() {
        // テスト項目: userDisconnected が退出通知に変換される
        // given (前提条件):
        let text = r#"{"type":"userDisconnected","username":"alice","timestamp":"2024-01-01T00:00:00.000Z","onlineUsers":["bob"]}"#;

        // when (操作):
        let result = render(text, "bob");

        // then (期待する結果):
        assert!(result.contains("- User alice has left the chat"));
        assert!(result.contains("Online (1): bob (me)"));
    }

    #[test]
    fn test_render_error() {
        // テスト項目: error がエラー表示に変換される
        // given (前提条件):
        let text = r#"{"type":"error","message":"Failed to send message"}"#;

        // when (操作):
        let result = render(text, "bob");

        // then (期待する結果):
        assert_eq!(result, "\n! Failed to send message\n");
    }

    #[test]
    fn test_render_unknown_type_falls_back_to_raw() {
        // テスト項目: 未知の type はそのまま表示される
        // given (前提条件):
        let text = r#"{"type":"typing","username":"alice"}"#;

        // when (操作):
        let result = render(text, "bob");

        // then (期待する結果):
        assert_eq!(result, format!("\n{}\n", text));
    }
}
