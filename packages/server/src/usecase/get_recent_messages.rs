//! UseCase: 直近のメッセージ履歴の取得

use std::sync::Arc;

use crate::domain::{MessageRepository, RepositoryError, StoredMessage};

/// 1 回に返す履歴の上限
pub const MAX_HISTORY_LIMIT: usize = 200;

pub struct GetRecentMessagesUseCase {
    repository: Arc<dyn MessageRepository>,
    default_limit: usize,
}

impl GetRecentMessagesUseCase {
    pub fn new(repository: Arc<dyn MessageRepository>, default_limit: usize) -> Self {
        Self {
            repository,
            default_limit: default_limit.clamp(1, MAX_HISTORY_LIMIT),
        }
    }

    /// 直近のメッセージを古い順に返す
    ///
    /// `limit` を省略した場合は既定値、指定した場合は `1..=MAX_HISTORY_LIMIT` に丸める。
    pub async fn execute(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<StoredMessage>, RepositoryError> {
        let limit = limit
            .unwrap_or(self.default_limit)
            .clamp(1, MAX_HISTORY_LIMIT);
        self.repository.recent(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::MockMessageRepository;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_default_limit_is_used() {
        // テスト項目: limit 省略時は既定値で取得する
        // given (前提条件):
        let mut repository = MockMessageRepository::new();
        repository
            .expect_recent()
            .with(eq(50))
            .times(1)
            .returning(|_| Ok(vec![]));
        let usecase = GetRecentMessagesUseCase::new(Arc::new(repository), 50);

        // when (操作):
        let result = usecase.execute(None).await;

        // then (期待する結果):
        assert!(result.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_limit_is_clamped() {
        // テスト項目: 上限を超える limit と 0 は範囲内に丸められる
        // given (前提条件):
        let mut repository = MockMessageRepository::new();
        repository
            .expect_recent()
            .with(eq(MAX_HISTORY_LIMIT))
            .times(1)
            .returning(|_| Ok(vec![]));
        repository
            .expect_recent()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(vec![]));
        let usecase = GetRecentMessagesUseCase::new(Arc::new(repository), 50);

        // when (操作):
        let too_many = usecase.execute(Some(10_000)).await;
        let zero = usecase.execute(Some(0)).await;

        // then (期待する結果):
        assert!(too_many.is_ok());
        assert!(zero.is_ok());
    }

    #[tokio::test]
    async fn test_repository_error_is_propagated() {
        // テスト項目: Repository のエラーはそのまま返される
        // given (前提条件):
        let mut repository = MockMessageRepository::new();
        repository
            .expect_recent()
            .returning(|_| Err(RepositoryError::Unavailable("down".to_string())));
        let usecase = GetRecentMessagesUseCase::new(Arc::new(repository), 50);

        // when (操作):
        let result = usecase.execute(Some(10)).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RepositoryError::Unavailable("down".to_string()))
        );
    }
}
