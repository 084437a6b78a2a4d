//! Broadcast Engine のインターフェース

use async_trait::async_trait;

use super::entity::ChatEvent;

/// 1 回のブロードキャストの結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// 送信キューに積めたハンドル数
    pub delivered: usize,
    /// 既に閉じていたハンドル数
    pub failed: usize,
}

/// イベントを全ての生存中の接続へ配信する
///
/// 配信はハンドルごとのベストエフォート。送信失敗は呼び出し側へエラーとして
/// 返さず、レジストリからの削除も行わない（通常の切断処理に任せる）。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventBroadcaster: Send + Sync {
    async fn broadcast(&self, event: ChatEvent) -> BroadcastReport;
}
