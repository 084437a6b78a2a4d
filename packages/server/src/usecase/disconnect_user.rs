//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectUserUseCase::execute() メソッド
//! - レジストリからの削除と退出通知
//!
//! ### なぜこのテストが必要か
//! - 二重クローズで退出通知が重複しないことを保証
//! - 新しい接続に置き換えられたユーザーが退出扱いにならないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：切断と残りのユーザーへの通知
//! - エッジケース：二重クローズ、置き換え済み接続の切断

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatEvent, ConnectionId, ConnectionRegistry, EventBroadcaster, Timestamp, Username,
};

use super::presence_lock::PresenceLock;

/// 切断のユースケース
pub struct DisconnectUserUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    broadcaster: Arc<dyn EventBroadcaster>,
    clock: Arc<dyn Clock>,
    presence: Arc<PresenceLock>,
}

impl DisconnectUserUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        broadcaster: Arc<dyn EventBroadcaster>,
        clock: Arc<dyn Clock>,
        presence: Arc<PresenceLock>,
    ) -> Self {
        Self {
            registry,
            broadcaster,
            clock,
            presence,
        }
    }

    /// 切断を実行（Admitted → Closed）
    ///
    /// # Arguments
    ///
    /// * `username` - 切断したユーザー
    /// * `connection_id` - 閉じた接続の ID
    ///
    /// # Returns
    ///
    /// `UserLeft` をブロードキャストした場合は `true`。エントリが既に無い、または
    /// 新しい接続に置き換わっている場合は何もせず `false`。
    pub async fn execute(&self, username: &Username, connection_id: ConnectionId) -> bool {
        let _guard = self.presence.acquire().await;

        if !self.registry.remove(username, connection_id).await {
            tracing::debug!(
                "Connection {} of '{}' closed without owning the entry",
                connection_id,
                username
            );
            return false;
        }

        let online_users = self.registry.snapshot_usernames().await;
        let event = ChatEvent::UserLeft {
            username: username.clone(),
            online_users,
            timestamp: Timestamp::new(self.clock.now_millis()),
        };
        let report = self.broadcaster.broadcast(event).await;
        tracing::info!(
            "'{}' left (connection {}, notified {})",
            username,
            connection_id,
            report.delivered
        );
        true
    }
}
