//! UseCase: 接続受付（Session Gate）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectUserUseCase::execute(): セッション照会による認証
//! - ConnectUserUseCase::admit(): レジストリへの登録と参加通知
//!
//! ### なぜこのテストが必要か
//! - 未認証の接続がレジストリに入らないこと、ブロードキャストも起きないことを保証
//! - 同じユーザーの再接続で参加通知が重複しないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ユーザーの接続
//! - 異常系：トークン無し・不明なトークン
//! - エッジケース：別タブからの再接続（ハンドルの置き換え）

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    Admission, AuthenticatedUser, ChatEvent, ConnectionHandle, ConnectionRegistry,
    EventBroadcaster, SessionStore, SessionToken, Timestamp,
};

use super::{error::ConnectError, presence_lock::PresenceLock};

/// 接続受付のユースケース
pub struct ConnectUserUseCase {
    session_store: Arc<dyn SessionStore>,
    registry: Arc<dyn ConnectionRegistry>,
    broadcaster: Arc<dyn EventBroadcaster>,
    clock: Arc<dyn Clock>,
    presence: Arc<PresenceLock>,
}

impl ConnectUserUseCase {
    pub fn new(
        session_store: Arc<dyn SessionStore>,
        registry: Arc<dyn ConnectionRegistry>,
        broadcaster: Arc<dyn EventBroadcaster>,
        clock: Arc<dyn Clock>,
        presence: Arc<PresenceLock>,
    ) -> Self {
        Self {
            session_store,
            registry,
            broadcaster,
            clock,
            presence,
        }
    }

    /// 接続が認証済みセッションを持っているか確認する（Pending → Admitted の前提条件）
    ///
    /// レジストリには一切触れない。
    ///
    /// # Returns
    ///
    /// * `Ok(AuthenticatedUser)` - 照会に成功
    /// * `Err(ConnectError::Unauthenticated)` - トークンが無い、または不明
    pub async fn execute(
        &self,
        token: Option<String>,
    ) -> Result<AuthenticatedUser, ConnectError> {
        let token = token
            .and_then(|raw| SessionToken::new(raw).ok())
            .ok_or(ConnectError::Unauthenticated)?;

        self.session_store
            .lookup(&token)
            .await
            .ok_or(ConnectError::Unauthenticated)
    }

    /// 認証済みの接続をレジストリに登録する
    ///
    /// 新規接続の場合のみ `UserJoined` をブロードキャストする。置き換えの場合は
    /// ユーザーは既に在室者一覧に含まれているので何も通知しない。
    pub async fn admit(&self, user: &AuthenticatedUser, handle: ConnectionHandle) -> Admission {
        let connection_id = handle.id();
        let _guard = self.presence.acquire().await;

        let admission = self.registry.admit(user.username.clone(), handle).await;
        match admission {
            Admission::New => {
                let online_users = self.registry.snapshot_usernames().await;
                let event = ChatEvent::UserJoined {
                    username: user.username.clone(),
                    online_users,
                    timestamp: Timestamp::new(self.clock.now_millis()),
                };
                let report = self.broadcaster.broadcast(event).await;
                tracing::info!(
                    "'{}' joined (connection {}, notified {})",
                    user.username,
                    connection_id,
                    report.delivered
                );
            }
            Admission::Takeover { replaced } => {
                tracing::info!(
                    "'{}' reconnected: connection {} replaces {}",
                    user.username,
                    connection_id,
                    replaced
                );
            }
        }

        admission
    }
}
