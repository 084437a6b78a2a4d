//! HTTP API calls made before joining the room.

use hiroba_server::infrastructure::dto::http::{
    CreateSessionRequest, EndSessionRequest, SessionDto, StoredMessageDto,
};
use reqwest::StatusCode;

use crate::error::ClientError;

/// Obtain a session token for `username`.
pub async fn create_session(
    http: &reqwest::Client,
    base_url: &str,
    username: &str,
) -> Result<SessionDto, ClientError> {
    let response = http
        .post(format!("{}/api/sessions", base_url.trim_end_matches('/')))
        .json(&CreateSessionRequest {
            username: username.to_string(),
        })
        .send()
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    if response.status() == StatusCode::BAD_REQUEST {
        return Err(ClientError::Unauthenticated(username.to_string()));
    }

    Ok(response.error_for_status()?.json().await?)
}

/// Fetch the most recent `limit` messages, oldest first.
pub async fn recent_messages(
    http: &reqwest::Client,
    base_url: &str,
    limit: usize,
) -> Result<Vec<StoredMessageDto>, ClientError> {
    let response = http
        .get(format!("{}/api/messages", base_url.trim_end_matches('/')))
        .query(&[("limit", limit)])
        .send()
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    Ok(response.error_for_status()?.json().await?)
}

/// End the session so the server can forget the token.
pub async fn end_session(
    http: &reqwest::Client,
    base_url: &str,
    token: &str,
) -> Result<(), ClientError> {
    http.delete(format!("{}/api/sessions", base_url.trim_end_matches('/')))
        .json(&EndSessionRequest {
            token: token.to_string(),
        })
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}
