//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the session (HTTP 401 on upgrade, or rejected username)
    #[error("Server rejected the session for '{0}'")]
    Unauthenticated(String),

    /// Could not establish a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An established connection was lost
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    /// HTTP API error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),
}
