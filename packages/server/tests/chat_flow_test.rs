//! Integration tests: run the router in-process on an ephemeral port and
//! drive it over real HTTP and WebSocket connections.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use hiroba_server::{
    domain::{
        MessageContent, MessageRepository, RepositoryError, StoredMessage, Timestamp, Username,
    },
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
use hiroba_shared::time::SystemClock;
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{
        self,
        client::IntoClientRequest,
        http::{HeaderValue, header},
        protocol::Message,
    },
};

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Message store whose backend is always down.
struct UnavailableRepository;

#[async_trait]
impl MessageRepository for UnavailableRepository {
    async fn append(
        &self,
        _content: MessageContent,
        _sender: Username,
        _timestamp: Timestamp,
    ) -> Result<StoredMessage, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }

    async fn recent(&self, _limit: usize) -> Result<Vec<StoredMessage>, RepositoryError> {
        Err(RepositoryError::Unavailable("storage offline".to_string()))
    }
}

/// Start a server with in-memory adapters and return its address.
async fn start_server() -> SocketAddr {
    start_server_with(Arc::new(InMemoryMessageRepository::new())).await
}

async fn start_server_with(repository: Arc<dyn MessageRepository>) -> SocketAddr {
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let sessions = Arc::new(InMemorySessionStore::new());
    let clock = Arc::new(SystemClock);
    let broadcaster = Arc::new(WebSocketBroadcaster::new(registry.clone()));
    let presence = Arc::new(PresenceLock::new());

    let server = Server::new(
        Arc::new(ConnectUserUseCase::new(
            sessions.clone(),
            registry.clone(),
            broadcaster.clone(),
            clock.clone(),
            presence.clone(),
        )),
        Arc::new(DisconnectUserUseCase::new(
            registry.clone(),
            broadcaster.clone(),
            clock.clone(),
            presence,
        )),
        Arc::new(SendMessageUseCase::new(
            repository.clone(),
            broadcaster,
            clock,
        )),
        Arc::new(GetRecentMessagesUseCase::new(repository, 50)),
        Arc::new(GetOnlineUsersUseCase::new(registry)),
        Arc::new(CreateSessionUseCase::new(sessions.clone())),
        Arc::new(EndSessionUseCase::new(sessions)),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        server.serve(listener).await.unwrap();
    });
    addr
}

async fn create_session(addr: SocketAddr, username: &str) -> String {
    let response: Value = reqwest::Client::new()
        .post(format!("http://{}/api/sessions", addr))
        .json(&serde_json::json!({ "username": username }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    response["token"].as_str().unwrap().to_string()
}

async fn connect(addr: SocketAddr, username: &str) -> Ws {
    let token = create_session(addr, username).await;
    let (ws, _) = connect_async(format!("ws://{}/ws?token={}", addr, token))
        .await
        .unwrap();
    ws
}

/// Connect carrying the token in the session cookie instead of the query.
async fn connect_with_cookie(addr: SocketAddr, username: &str) -> Ws {
    let token = create_session(addr, username).await;
    let mut request = format!("ws://{}/ws", addr).into_client_request().unwrap();
    request.headers_mut().insert(
        header::COOKIE,
        HeaderValue::from_str(&format!("theme=dark; hiroba_session={}", token)).unwrap(),
    );
    let (ws, _) = connect_async(request).await.unwrap();
    ws
}

async fn end_session(addr: SocketAddr, token: &str) -> reqwest::StatusCode {
    reqwest::Client::new()
        .delete(format!("http://{}/api/sessions", addr))
        .json(&serde_json::json!({ "token": token }))
        .send()
        .await
        .unwrap()
        .status()
}

async fn recv_json(ws: &mut Ws) -> Value {
    loop {
        let msg = tokio::time::timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for a message")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Read until the server side of the connection is gone.
async fn drain_until_closed(ws: &mut Ws) {
    while let Ok(Some(Ok(_))) = tokio::time::timeout(RECV_TIMEOUT, ws.next()).await {}
}

async fn send_chat(ws: &mut Ws, message: &str) {
    let payload = serde_json::json!({ "type": "chatMessage", "message": message });
    ws.send(Message::text(payload.to_string())).await.unwrap();
}

async fn online_users(addr: SocketAddr) -> Value {
    reqwest::get(format!("http://{}/api/online-users", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn recent_messages(addr: SocketAddr) -> Value {
    reqwest::get(format!("http://{}/api/messages", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_join_chat_and_leave_scenario() {
    // テスト項目: 参加・発言・退出の一連の流れで在室者一覧とイベントが一貫している
    // given (前提条件):
    let addr = start_server().await;

    // when (操作): alice が接続
    let mut alice = connect(addr, "alice").await;

    // then (期待する結果):
    let joined = recv_json(&mut alice).await;
    assert_eq!(joined["type"], "userConnected");
    assert_eq!(joined["username"], "alice");
    assert_eq!(joined["message"], "User alice has joined the chat!");
    assert_eq!(joined["onlineUsers"], serde_json::json!(["alice"]));

    // when (操作): bob が接続
    let mut bob = connect(addr, "bob").await;

    // then (期待する結果): 2 人とも同じ在室者一覧を受け取る
    for ws in [&mut alice, &mut bob] {
        let joined = recv_json(ws).await;
        assert_eq!(joined["type"], "userConnected");
        assert_eq!(joined["username"], "bob");
        assert_eq!(joined["onlineUsers"], serde_json::json!(["alice", "bob"]));
    }

    // when (操作): alice が発言
    send_chat(&mut alice, "hi").await;

    // then (期待する結果): 送信者を含む全員に届き、1 回だけ永続化される
    for ws in [&mut alice, &mut bob] {
        let chat = recv_json(ws).await;
        assert_eq!(chat["type"], "chatMessage");
        assert_eq!(chat["sender"], "alice");
        assert_eq!(chat["message"], "hi");
        assert!(chat["timestamp"].as_str().unwrap().ends_with('Z'));
    }
    let history = recent_messages(addr).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["content"], "hi");
    assert_eq!(history[0]["sender"], "alice");

    // when (操作): bob が切断
    bob.close(None).await.unwrap();

    // then (期待する結果):
    let left = recv_json(&mut alice).await;
    assert_eq!(left["type"], "userDisconnected");
    assert_eq!(left["username"], "bob");
    assert_eq!(left["onlineUsers"], serde_json::json!(["alice"]));
    assert_eq!(online_users(addr).await["onlineUsers"], serde_json::json!(["alice"]));
}

#[tokio::test]
async fn test_unauthenticated_connection_is_refused() {
    // テスト項目: 認証されていない接続は拒否され、在室者にも現れない
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = connect(addr, "alice").await;
    recv_json(&mut alice).await;

    // when (操作):
    let result = connect_async(format!("ws://{}/ws?token=forged", addr)).await;

    // then (期待する結果):
    match result {
        Err(tungstenite::Error::Http(response)) => assert_eq!(response.status(), 401),
        other => panic!("expected HTTP 401, got {:?}", other.map(|_| ())),
    }
    assert_eq!(online_users(addr).await["count"], 1);

    // alice には何もブロードキャストされていない（次に届くのは自分の発言）
    send_chat(&mut alice, "still here").await;
    let next = recv_json(&mut alice).await;
    assert_eq!(next["type"], "chatMessage");
}

#[tokio::test]
async fn test_malformed_payload_keeps_connection_open() {
    // テスト項目: 不正なペイロードは破棄され、接続も他の利用者も影響を受けない
    // given (前提条件):
    let addr = start_server().await;
    let mut alice = connect(addr, "alice").await;
    recv_json(&mut alice).await;

    // when (操作):
    alice.send(Message::text("not json")).await.unwrap();
    alice
        .send(Message::text(r#"{"type":"typing"}"#))
        .await
        .unwrap();
    send_chat(&mut alice, "   ").await;
    send_chat(&mut alice, "hello").await;

    // then (期待する結果): 次に届くのは有効なメッセージだけ
    let next = recv_json(&mut alice).await;
    assert_eq!(next["type"], "chatMessage");
    assert_eq!(next["message"], "hello");
    assert_eq!(online_users(addr).await["count"], 1);
    assert_eq!(recent_messages(addr).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_reconnect_with_same_username_is_silent() {
    // テスト項目: 同じユーザー名での再接続は参加通知を出さず、在室者も重複しない
    // given (前提条件):
    let addr = start_server().await;
    let mut bob = connect(addr, "bob").await;
    recv_json(&mut bob).await;
    let mut alice = connect(addr, "alice").await;
    recv_json(&mut alice).await;
    recv_json(&mut bob).await;

    // when (操作): alice が別タブから接続
    let mut alice_second = connect(addr, "alice").await;
    send_chat(&mut alice_second, "from the new tab").await;

    // then (期待する結果): bob に次に届くのは発言で、参加通知ではない
    let next = recv_json(&mut bob).await;
    assert_eq!(next["type"], "chatMessage");
    assert_eq!(next["message"], "from the new tab");
    assert_eq!(
        online_users(addr).await["onlineUsers"],
        serde_json::json!(["alice", "bob"])
    );

    // when (操作): 古いタブを閉じる
    alice.close(None).await.unwrap();
    drain_until_closed(&mut alice).await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    send_chat(&mut alice_second, "still online").await;

    // then (期待する結果): 退出通知は出ず、alice は在室のまま
    let next = recv_json(&mut bob).await;
    assert_eq!(next["type"], "chatMessage");
    assert_eq!(next["message"], "still online");
    assert_eq!(
        online_users(addr).await["onlineUsers"],
        serde_json::json!(["alice", "bob"])
    );
}

#[tokio::test]
async fn test_session_endpoint_rejects_blank_username() {
    // テスト項目: 空のユーザー名ではセッションを発行しない
    // given (前提条件):
    let addr = start_server().await;

    // when (操作):
    let response = reqwest::Client::new()
        .post(format!("http://{}/api/sessions", addr))
        .json(&serde_json::json!({ "username": "  " }))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェックが ok を返す
    // given (前提条件):
    let addr = start_server().await;

    // when (操作):
    let body: Value = reqwest::get(format!("http://{}/api/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_persistence_failure_is_reported_to_sender_only() {
    // テスト項目: 永続化に失敗した発言は配信されず、送信者だけにエラーが届き接続は維持される
    // given (前提条件): bob は Cookie のセッションで接続
    let addr = start_server_with(Arc::new(UnavailableRepository)).await;
    let mut alice = connect(addr, "alice").await;
    recv_json(&mut alice).await;
    let mut bob = connect_with_cookie(addr, "bob").await;
    for ws in [&mut alice, &mut bob] {
        let joined = recv_json(ws).await;
        assert_eq!(joined["username"], "bob");
        assert_eq!(joined["onlineUsers"], serde_json::json!(["alice", "bob"]));
    }

    // when (操作):
    send_chat(&mut alice, "hi").await;

    // then (期待する結果):
    let error = recv_json(&mut alice).await;
    assert_eq!(
        error,
        serde_json::json!({ "type": "error", "message": "Failed to send message" })
    );
    let nothing = tokio::time::timeout(Duration::from_millis(500), bob.next()).await;
    assert!(nothing.is_err(), "bob received {:?}", nothing);

    // alice の接続は開いたまま
    send_chat(&mut alice, "again").await;
    assert_eq!(recv_json(&mut alice).await["type"], "error");
    assert_eq!(online_users(addr).await["count"], 2);

    let history = reqwest::get(format!("http://{}/api/messages", addr))
        .await
        .unwrap();
    assert_eq!(history.status(), 503);
}

#[tokio::test]
async fn test_ended_session_cannot_connect() {
    // テスト項目: 終了したセッションのトークンでは接続できず、2 回目の終了は 404
    // given (前提条件):
    let addr = start_server().await;
    let token = create_session(addr, "alice").await;

    // when (操作):
    let first = end_session(addr, &token).await;
    let second = end_session(addr, &token).await;
    let result = connect_async(format!("ws://{}/ws?token={}", addr, token)).await;

    // then (期待する結果):
    assert_eq!(first, 204);
    assert_eq!(second, 404);
    match result {
        Err(tungstenite::Error::Http(response)) => assert_eq!(response.status(), 401),
        other => panic!("expected HTTP 401, got {:?}", other.map(|_| ())),
    }
    assert_eq!(online_users(addr).await["count"], 0);
}
