//! InMemory Message Repository 実装
//!
//! ドメイン層が定義する MessageRepository trait の具体的な実装。
//! `Vec` を追記専用ログとして使用します。
//!
//! ## 技術的負債
//!
//! プロセス終了で履歴は失われます。永続ストア（PostgreSQL など）を実装する
//! 際は、この trait の別実装として追加します。

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    MessageContent, MessageRepository, RepositoryError, StoredMessage, Timestamp, Username,
};

/// インメモリ Message Repository 実装
pub struct InMemoryMessageRepository {
    /// 追記順のメッセージ
    messages: RwLock<Vec<StoredMessage>>,
    /// 保持する最大件数（超えた分は古い順に捨てる）
    retention: Option<usize>,
}

impl InMemoryMessageRepository {
    /// 上限なしの Repository を作成
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(Vec::new()),
            retention: None,
        }
    }

    /// 直近 `retention` 件だけを保持する Repository を作成
    pub fn with_retention(retention: usize) -> Self {
        Self {
            messages: RwLock::new(Vec::new()),
            retention: Some(retention.max(1)),
        }
    }
}

impl Default for InMemoryMessageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(
        &self,
        content: MessageContent,
        sender: Username,
        timestamp: Timestamp,
    ) -> Result<StoredMessage, RepositoryError> {
        let message = StoredMessage::new(content, sender, timestamp);

        let mut messages = self.messages.write().await;
        messages.push(message.clone());
        if let Some(retention) = self.retention
            && messages.len() > retention
        {
            let excess = messages.len() - retention;
            messages.drain(..excess);
        }

        Ok(message)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<StoredMessage>, RepositoryError> {
        let messages = self.messages.read().await;
        let start = messages.len().saturating_sub(limit);
        Ok(messages[start..].to_vec())
    }
}
