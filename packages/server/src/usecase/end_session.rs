//! UseCase: セッション終了
//!
//! クライアントの終了時（ログアウト）にトークンを失効させる。接続済みの
//! WebSocket はそのまま残り、以降の接続だけが拒否される。

use std::sync::Arc;

use crate::domain::{SessionIssuer, SessionToken};

pub struct EndSessionUseCase {
    issuer: Arc<dyn SessionIssuer>,
}

impl EndSessionUseCase {
    pub fn new(issuer: Arc<dyn SessionIssuer>) -> Self {
        Self { issuer }
    }

    /// トークンを失効させる。不明なトークン・空文字なら `false`。
    pub async fn execute(&self, raw_token: String) -> bool {
        match SessionToken::new(raw_token) {
            Ok(token) => self.issuer.revoke(&token).await,
            Err(_) => false,
        }
    }
}
