//! Repository trait 定義
//!
//! ドメイン層が必要とするメッセージ永続化のインターフェース（Persistence Port）。
//! 具体的な実装は Infrastructure 層が提供する（依存性の逆転）。

use async_trait::async_trait;

use super::{
    entity::StoredMessage,
    error::RepositoryError,
    value_object::{MessageContent, Timestamp, Username},
};

/// Message Repository trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// メッセージを永続化し、保存された内容を返す
    async fn append(
        &self,
        content: MessageContent,
        sender: Username,
        timestamp: Timestamp,
    ) -> Result<StoredMessage, RepositoryError>;

    /// 直近 `limit` 件を古い順に返す
    async fn recent(&self, limit: usize) -> Result<Vec<StoredMessage>, RepositoryError>;
}
