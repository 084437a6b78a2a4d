//! Conversion logic between DTOs and domain entities.

use hiroba_shared::time::timestamp_to_rfc3339;

use crate::domain::{AuthenticatedUser, ChatEvent, SessionToken, StoredMessage, Username};
use crate::infrastructure::dto::{http, websocket as ws};

fn usernames_to_strings(usernames: Vec<Username>) -> Vec<String> {
    usernames.into_iter().map(Username::into_string).collect()
}

// ========================================
// Domain → DTO
// ========================================

impl From<ChatEvent> for ws::ServerMessage {
    fn from(event: ChatEvent) -> Self {
        match event {
            ChatEvent::Message {
                sender,
                content,
                timestamp,
            } => Self::ChatMessage {
                message: content.into_string(),
                sender: sender.into_string(),
                timestamp: timestamp_to_rfc3339(timestamp.value()),
            },
            ChatEvent::UserJoined {
                username,
                online_users,
                timestamp,
            } => Self::UserConnected {
                message: ws::ServerMessage::joined_notice(username.as_str()),
                username: username.into_string(),
                timestamp: timestamp_to_rfc3339(timestamp.value()),
                online_users: usernames_to_strings(online_users),
            },
            ChatEvent::UserLeft {
                username,
                online_users,
                timestamp,
            } => Self::UserDisconnected {
                username: username.into_string(),
                timestamp: timestamp_to_rfc3339(timestamp.value()),
                online_users: usernames_to_strings(online_users),
            },
        }
    }
}

impl From<StoredMessage> for http::StoredMessageDto {
    fn from(message: StoredMessage) -> Self {
        Self {
            content: message.content.into_string(),
            sender: message.sender.into_string(),
            timestamp: timestamp_to_rfc3339(message.timestamp.value()),
        }
    }
}

impl From<Vec<Username>> for http::OnlineUsersDto {
    fn from(usernames: Vec<Username>) -> Self {
        Self {
            count: usernames.len(),
            online_users: usernames_to_strings(usernames),
        }
    }
}

impl From<(SessionToken, AuthenticatedUser)> for http::SessionDto {
    fn from((token, user): (SessionToken, AuthenticatedUser)) -> Self {
        Self {
            token: token.as_str().to_string(),
            user_id: user.user_id.as_str().to_string(),
            username: user.username.into_string(),
        }
    }
}
