//! UseCase: 在室者一覧の取得

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, Username};

pub struct GetOnlineUsersUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl GetOnlineUsersUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(&self) -> Vec<Username> {
        self.registry.snapshot_usernames().await
    }
}
