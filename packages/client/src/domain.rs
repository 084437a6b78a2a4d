//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use crate::error::ClientError;

/// Check if the client should exit immediately based on the error type.
///
/// # Returns
///
/// `true` if the error can never be fixed by reconnecting
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::Unauthenticated(_) | ClientError::InvalidUrl(_)
    )
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The number of consecutive failed attempts so far
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Classify a `401` on the WebSocket upgrade.
///
/// A token carried over from an earlier connection may have been revoked or
/// lost by a server restart, so that case is retried with a fresh session.
/// A token issued moments ago being refused is final.
pub fn upgrade_rejected(username: &str, token_was_reused: bool) -> ClientError {
    if token_was_reused {
        ClientError::ConnectionError("session is no longer valid".to_string())
    } else {
        ClientError::Unauthenticated(username.to_string())
    }
}

/// Derive the WebSocket endpoint from the HTTP base URL.
///
/// `http://host:port` → `ws://host:port/ws?token=...`
pub fn websocket_url(base_url: &str, token: &str) -> Result<String, ClientError> {
    let base = base_url.trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        return Err(ClientError::InvalidUrl(base_url.to_string()));
    };
    Ok(format!("{}/ws?token={}", ws_base, token))
}
