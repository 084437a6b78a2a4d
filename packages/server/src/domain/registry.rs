//! Connection Registry のインターフェース
//!
//! ユーザー名から生存中の接続ハンドルへの対応表で、「誰がオンラインか」の
//! 唯一の情報源。1 ユーザー名につきエントリは常に高々 1 つ。

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::value_object::{ConnectionId, Username};

/// 接続ごとの送信チャンネル（WebSocket の送信タスクが受信側を持つ）
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// 送信先の接続が既に閉じている
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("connection {0} is closed")]
pub struct SendError(pub ConnectionId);

/// 1 つの生存中の接続への送信ハンドル
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: PusherChannel,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, sender: PusherChannel) -> Self {
        Self { id, sender }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// ペイロードを送信キューに積む。受信側が破棄されていれば失敗を返す。
    pub fn send(&self, payload: String) -> Result<(), SendError> {
        self.sender.send(payload).map_err(|_| SendError(self.id))
    }
}

/// `admit` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// 新規エントリとして登録された
    New,
    /// 同じユーザー名の既存エントリのハンドルを置き換えた
    Takeover { replaced: ConnectionId },
}

/// Connection Registry
///
/// 全ての操作は同一の排他領域で直列化される。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// ハンドルを登録する。既存エントリがあればハンドルを置き換える（後勝ち）。
    async fn admit(&self, username: Username, handle: ConnectionHandle) -> Admission;

    /// `connection_id` がエントリを所有している場合に限り削除する。
    ///
    /// 削除した場合は `true`。エントリが無い、または新しい接続に置き換わって
    /// いる場合は何もせず `false`。
    async fn remove(&self, username: &Username, connection_id: ConnectionId) -> bool;

    /// 現在のユーザー名一覧（昇順）
    async fn snapshot_usernames(&self) -> Vec<Username>;

    /// 現在の全ハンドルのスナップショット
    ///
    /// ロック下で複製して返すため、配信はロックを保持せずに行える。
    async fn snapshot_handles(&self) -> Vec<(Username, ConnectionHandle)>;

    /// 接続中のユーザー数
    async fn count(&self) -> usize;
}
