//! Message formatting utilities for client display.

use hiroba_server::infrastructure::dto::{http::StoredMessageDto, websocket::ServerMessage};
use hiroba_shared::time::{parse_rfc3339, timestamp_to_local_display};

const RULE: &str = "------------------------------------------------------------";
const BANNER: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the recent history fetched before joining
    pub fn format_history(messages: &[StoredMessageDto], current_user: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\nRecent messages:\n", BANNER));

        if messages.is_empty() {
            output.push_str("(No messages yet)\n");
        } else {
            for message in messages {
                output.push_str(&format!(
                    "[{}] {}: {}\n",
                    display_time(&message.timestamp),
                    display_name(&message.sender, current_user),
                    message.content
                ));
            }
        }

        output.push_str(BANNER);
        output.push('\n');
        output
    }

    /// Format the roster carried by join / leave events
    ///
    /// # Arguments
    ///
    /// * `online_users` - Usernames currently in the room
    /// * `current_user` - The current user's name (to mark as "me")
    pub fn format_online_users(online_users: &[String], current_user: &str) -> String {
        let names: Vec<String> = online_users
            .iter()
            .map(|name| display_name(name, current_user))
            .collect();
        format!("Online ({}): {}\n", names.len(), names.join(", "))
    }

    /// Format a user-connected notification
    pub fn format_user_connected(
        message: &str,
        timestamp: &str,
        online_users: &[String],
        current_user: &str,
    ) -> String {
        format!(
            "\n+ {} ({})\n{}",
            message,
            display_time(timestamp),
            Self::format_online_users(online_users, current_user)
        )
    }

    /// Format a user-disconnected notification
    pub fn format_user_disconnected(
        username: &str,
        timestamp: &str,
        online_users: &[String],
        current_user: &str,
    ) -> String {
        format!(
            "\n- {} ({})\n{}",
            ServerMessage::left_notice(username),
            display_time(timestamp),
            Self::format_online_users(online_users, current_user)
        )
    }

    /// Format a chat message
    ///
    /// # Arguments
    ///
    /// * `sender` - The username of the sender
    /// * `content` - The message content
    /// * `timestamp` - RFC 3339 timestamp assigned by the server
    /// * `current_user` - The current user's name
    pub fn format_chat_message(
        sender: &str,
        content: &str,
        timestamp: &str,
        current_user: &str,
    ) -> String {
        format!(
            "\n\n{RULE}\n@{}: {}\nsent at {}\n{RULE}\n",
            display_name(sender, current_user),
            content,
            display_time(timestamp)
        )
    }

    /// Format an error reported by the server
    pub fn format_error(message: &str) -> String {
        format!("\n! {}\n", message)
    }

    /// Format a payload the client does not understand
    pub fn format_raw_message(text: &str) -> String {
        format!("\n{}\n", text)
    }
}

fn display_name(name: &str, current_user: &str) -> String {
    if name == current_user {
        format!("{} (me)", name)
    } else {
        name.to_string()
    }
}

/// Render a server timestamp in local time, or verbatim when it cannot be parsed.
fn display_time(timestamp: &str) -> String {
    parse_rfc3339(timestamp)
        .map(timestamp_to_local_display)
        .unwrap_or_else(|| timestamp.to_string())
}
