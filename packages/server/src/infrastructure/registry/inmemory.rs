//! InMemory Connection Registry 実装
//!
//! ## 責務
//!
//! - ユーザー名 → `ConnectionHandle` の対応表を 1 つの `Mutex` で保護する
//! - admit / remove / snapshot を同じ排他領域で直列化する
//!
//! ## 設計ノート
//!
//! ハンドルのスナップショットは複製して返す。配信側はロックを解放してから
//! 送信するため、遅いピアがあっても接続の受付や切断処理は止まらない。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Admission, ConnectionHandle, ConnectionId, ConnectionRegistry, Username};

/// インメモリ Connection Registry 実装
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    /// Key: username, Value: その時点で有効な接続ハンドル
    clients: Mutex<HashMap<Username, ConnectionHandle>>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn admit(&self, username: Username, handle: ConnectionHandle) -> Admission {
        let connection_id = handle.id();
        let mut clients = self.clients.lock().await;
        match clients.insert(username.clone(), handle) {
            Some(previous) => {
                tracing::debug!(
                    "Replaced handle {} of '{}' with {}",
                    previous.id(),
                    username,
                    connection_id
                );
                Admission::Takeover {
                    replaced: previous.id(),
                }
            }
            None => {
                tracing::debug!("Admitted '{}' with handle {}", username, connection_id);
                Admission::New
            }
        }
    }

    async fn remove(&self, username: &Username, connection_id: ConnectionId) -> bool {
        let mut clients = self.clients.lock().await;
        let owned = clients
            .get(username)
            .is_some_and(|handle| handle.id() == connection_id);
        if owned {
            clients.remove(username);
            tracing::debug!("Removed '{}' (handle {})", username, connection_id);
        } else {
            tracing::debug!(
                "Handle {} no longer owns '{}', nothing to remove",
                connection_id,
                username
            );
        }
        owned
    }

    async fn snapshot_usernames(&self) -> Vec<Username> {
        let clients = self.clients.lock().await;
        let mut usernames: Vec<Username> = clients.keys().cloned().collect();
        usernames.sort();
        usernames
    }

    async fn snapshot_handles(&self) -> Vec<(Username, ConnectionHandle)> {
        let clients = self.clients.lock().await;
        clients
            .iter()
            .map(|(username, handle)| (username.clone(), handle.clone()))
            .collect()
    }

    async fn count(&self) -> usize {
        self.clients.lock().await.len()
    }
}
