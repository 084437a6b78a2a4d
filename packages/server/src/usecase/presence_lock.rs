//! 在室状態の変更とその通知を直列化するロック
//!
//! 参加・退出イベントは在室者一覧のスナップショットを含む。
//! 「レジストリの変更 → スナップショット取得 → 配信キューへの投入」をこのロックの
//! 下で行うことで、全クライアントが変更順どおりに一覧を受け取る。
//! 配信キューは無制限のチャンネルなので投入はブロックせず、遅い接続がロックを
//! 握り続けることはない。

use tokio::sync::{Mutex, MutexGuard};

/// 接続受付と切断のユースケースで共有する排他領域
#[derive(Debug, Default)]
pub struct PresenceLock(Mutex<()>);

impl PresenceLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// ロックを取得する。ガードを破棄するまで他の在室変更は待たされる。
    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.0.lock().await
    }
}
