//! UseCase errors.

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// 接続受付の失敗（その接続だけが閉じられる）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("connection carries no authenticated session")]
    Unauthenticated,
}

/// メッセージ送信の失敗（送信元の接続にだけ影響する）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    /// 破棄して接続は維持する
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] ValueObjectError),

    /// 永続化できなかったメッセージはブロードキャストしない
    #[error("failed to persist message: {0}")]
    PersistenceFailure(#[from] RepositoryError),
}
