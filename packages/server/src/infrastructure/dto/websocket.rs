//! WebSocket message DTOs for the chat application.
//!
//! Every payload is a JSON object tagged by its `type` field. Timestamps are
//! RFC 3339 strings in UTC.

use serde::{Deserialize, Serialize};

/// Client → Server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    ChatMessage { message: String },
}

impl ClientMessage {
    /// Parse an inbound text frame.
    ///
    /// Malformed JSON and unknown `type` values are both errors.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Server → Client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    ChatMessage {
        message: String,
        sender: String,
        timestamp: String,
    },
    UserConnected {
        username: String,
        message: String,
        timestamp: String,
        online_users: Vec<String>,
    },
    UserDisconnected {
        username: String,
        timestamp: String,
        online_users: Vec<String>,
    },
    /// Sent only to the connection whose request failed.
    Error { message: String },
}

impl ServerMessage {
    /// System line shown to users when someone joins.
    pub fn joined_notice(username: &str) -> String {
        format!("User {} has joined the chat!", username)
    }

    /// System line shown to users when someone leaves.
    pub fn left_notice(username: &str) -> String {
        format!("User {} has left the chat", username)
    }
}
