//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::http::{
        CreateSessionRequest, EndSessionRequest, HistoryQuery, OnlineUsersDto, SessionDto,
        StoredMessageDto,
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Recent chat history, oldest first
pub async fn get_recent_messages(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<StoredMessageDto>>, StatusCode> {
    match state.get_recent_messages_usecase.execute(query.limit).await {
        Ok(messages) => Ok(Json(messages.into_iter().map(Into::into).collect())),
        Err(e) => {
            tracing::error!("Failed to load recent messages: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Current presence roster
pub async fn get_online_users(State(state): State<Arc<AppState>>) -> Json<OnlineUsersDto> {
    Json(state.get_online_users_usecase.execute().await.into())
}

/// Issue a session for a username (stand-in for the external login service)
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionDto>), StatusCode> {
    match state.create_session_usecase.execute(request.username).await {
        Ok(session) => Ok((StatusCode::CREATED, Json(session.into()))),
        Err(e) => {
            tracing::warn!("Rejected session request: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

/// End a session (logout). Later upgrades with the token are refused.
pub async fn end_session(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EndSessionRequest>,
) -> StatusCode {
    if state.end_session_usecase.execute(request.token).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
