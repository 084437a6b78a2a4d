//! InMemory Session Store 実装
//!
//! 外部の認証サービスの代わりに、トークン → 認証済みユーザーの対応を
//! メモリ上に保持します。資格情報の検証は行いません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    AuthenticatedUser, SessionIssuer, SessionStore, SessionToken, UserId, Username,
};

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionToken, AuthenticatedUser>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionIssuer for InMemorySessionStore {
    async fn issue(&self, username: Username) -> (SessionToken, AuthenticatedUser) {
        let token = SessionToken::generate();
        let user = AuthenticatedUser::new(UserId::generate(), username);
        self.sessions
            .write()
            .await
            .insert(token.clone(), user.clone());
        tracing::info!("Issued session for '{}'", user.username);
        (token, user)
    }

    /// セッションを失効させる
    async fn revoke(&self, token: &SessionToken) -> bool {
        match self.sessions.write().await.remove(token) {
            Some(user) => {
                tracing::info!("Revoked session for '{}'", user.username);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn lookup(&self, token: &SessionToken) -> Option<AuthenticatedUser> {
        self.sessions.read().await.get(token).cloned()
    }
}
