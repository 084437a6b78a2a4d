//! UseCase: セッション発行
//!
//! 外部のログインサービスの代わりに、ユーザー名だけでセッションを発行する
//! 開発用の入口。資格情報は検証しない。

use std::sync::Arc;

use crate::domain::{
    AuthenticatedUser, SessionIssuer, SessionToken, Username, ValueObjectError,
};

pub struct CreateSessionUseCase {
    issuer: Arc<dyn SessionIssuer>,
}

impl CreateSessionUseCase {
    pub fn new(issuer: Arc<dyn SessionIssuer>) -> Self {
        Self { issuer }
    }

    pub async fn execute(
        &self,
        raw_username: String,
    ) -> Result<(SessionToken, AuthenticatedUser), ValueObjectError> {
        let username = Username::new(raw_username)?;
        Ok(self.issuer.issue(username).await)
    }
}
