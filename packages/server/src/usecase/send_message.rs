//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 永続化 → ブロードキャストの順序と、失敗時の振る舞い
//!
//! ### なぜこのテストが必要か
//! - 永続化できなかったメッセージが配信されないことを保証
//! - 配信されるタイムスタンプが永続化されたものと一致することを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：全員（送信者を含む）への配信
//! - 異常系：永続化失敗、不正な本文

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatEvent, EventBroadcaster, MessageContent, MessageRepository, StoredMessage, Timestamp,
    Username,
};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Persistence Port
    repository: Arc<dyn MessageRepository>,
    broadcaster: Arc<dyn EventBroadcaster>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        repository: Arc<dyn MessageRepository>,
        broadcaster: Arc<dyn EventBroadcaster>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            broadcaster,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信者（接続に紐づく認証済みユーザー名）
    /// * `raw_content` - クライアントから受け取った本文
    ///
    /// # Returns
    ///
    /// * `Ok(StoredMessage)` - 永続化して全員にブロードキャストした
    /// * `Err(SendMessageError)` - 何もブロードキャストしていない
    pub async fn execute(
        &self,
        sender: Username,
        raw_content: String,
    ) -> Result<StoredMessage, SendMessageError> {
        let content = MessageContent::new(raw_content)?;
        let timestamp = Timestamp::new(self.clock.now_millis());

        // 1. 永続化（レジストリのロックは取らない）
        let stored = self
            .repository
            .append(content, sender, timestamp)
            .await
            .inspect_err(|e| tracing::error!("Failed to persist message: {}", e))?;

        // 2. 永続化された内容をそのままブロードキャスト
        let report = self
            .broadcaster
            .broadcast(ChatEvent::from(stored.clone()))
            .await;
        tracing::info!(
            "Broadcasted message from '{}' to {} connection(s)",
            stored.sender,
            report.delivered
        );

        Ok(stored)
    }
}
