//! Domain errors.

use thiserror::Error;

/// 値オブジェクトの生成失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("username must not be empty")]
    UsernameEmpty,

    #[error("username is too long ({len} > {max} characters)")]
    UsernameTooLong { len: usize, max: usize },

    #[error("user id must not be empty")]
    UserIdEmpty,

    #[error("message content must not be empty")]
    MessageContentEmpty,

    #[error("message content is too long ({len} > {max} characters)")]
    MessageContentTooLong { len: usize, max: usize },

    #[error("session token must not be empty")]
    SessionTokenEmpty,
}

/// Persistence Port の失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("message store is unavailable: {0}")]
    Unavailable(String),

    #[error("message store rejected the message: {0}")]
    Rejected(String),
}
