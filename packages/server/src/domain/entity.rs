//! Entities and events.

use super::value_object::{MessageContent, Timestamp, UserId, Username};

/// 永続化済みのチャットメッセージ
///
/// Persistence Port が所有し、コアは参照するだけ。`timestamp` は永続化が
/// 受理した時点の値で、ブロードキャストにも同じ値を使う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub content: MessageContent,
    pub sender: Username,
    pub timestamp: Timestamp,
}

impl StoredMessage {
    pub fn new(content: MessageContent, sender: Username, timestamp: Timestamp) -> Self {
        Self {
            content,
            sender,
            timestamp,
        }
    }
}

/// 外部のセッション照会で得られる認証済みユーザー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: Username,
}

impl AuthenticatedUser {
    pub fn new(user_id: UserId, username: Username) -> Self {
        Self { user_id, username }
    }
}

/// 接続中の全クライアントへ配信されるイベント
///
/// `online_users` はイベント生成時点のレジストリの完全なスナップショット。
/// 途中のイベントを取りこぼしたクライアントも次のイベントで正しい状態に収束する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Message {
        sender: Username,
        content: MessageContent,
        timestamp: Timestamp,
    },
    UserJoined {
        username: Username,
        online_users: Vec<Username>,
        timestamp: Timestamp,
    },
    UserLeft {
        username: Username,
        online_users: Vec<Username>,
        timestamp: Timestamp,
    },
}

impl ChatEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ChatEvent::Message { .. } => "message",
            ChatEvent::UserJoined { .. } => "user-joined",
            ChatEvent::UserLeft { .. } => "user-left",
        }
    }
}

impl From<StoredMessage> for ChatEvent {
    fn from(message: StoredMessage) -> Self {
        ChatEvent::Message {
            sender: message.sender,
            content: message.content,
            timestamp: message.timestamp,
        }
    }
}
