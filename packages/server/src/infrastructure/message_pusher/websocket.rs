//! WebSocket を使った EventBroadcaster 実装
//!
//! ## 責務
//!
//! - `ChatEvent` を wire 形式（JSON）に 1 度だけシリアライズする
//! - レジストリのスナップショットに含まれる全ハンドルへ同じペイロードを送る
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! ここでは生成済みの送信チャンネルに積むだけで、実際のソケット書き込みは
//! 接続ごとの送信タスクが行います。チャンネルは FIFO なので、同じ呼び出し元が
//! 続けて行ったブロードキャストは各宛先で順序どおりに届きます。

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    domain::{BroadcastReport, ChatEvent, ConnectionRegistry, EventBroadcaster},
    infrastructure::dto::websocket::ServerMessage,
};

/// WebSocket を使った EventBroadcaster 実装
pub struct WebSocketBroadcaster {
    registry: Arc<dyn ConnectionRegistry>,
}

impl WebSocketBroadcaster {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl EventBroadcaster for WebSocketBroadcaster {
    async fn broadcast(&self, event: ChatEvent) -> BroadcastReport {
        let kind = event.kind();
        let payload = match serde_json::to_string(&ServerMessage::from(event)) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Failed to serialize {} event: {}", kind, e);
                return BroadcastReport::default();
            }
        };

        // スナップショット取得後はロックを保持しない
        let targets = self.registry.snapshot_handles().await;

        let mut report = BroadcastReport::default();
        for (username, handle) in targets {
            match handle.send(payload.clone()) {
                Ok(()) => {
                    report.delivered += 1;
                    tracing::debug!("Pushed {} event to '{}'", kind, username);
                }
                Err(e) => {
                    // 削除は通常の切断処理に任せる
                    report.failed += 1;
                    tracing::warn!("Failed to push {} event to '{}': {}", kind, username, e);
                }
            }
        }

        tracing::debug!(
            "Broadcasted {} event (delivered: {}, failed: {})",
            kind,
            report.delivered,
            report.failed
        );
        report
    }
}
