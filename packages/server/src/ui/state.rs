//! Server state shared by every handler.

use std::sync::Arc;

use crate::usecase::{
    ConnectUserUseCase, CreateSessionUseCase, DisconnectUserUseCase, EndSessionUseCase,
    GetOnlineUsersUseCase, GetRecentMessagesUseCase, SendMessageUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectUserUseCase（認証と接続受付）
    pub connect_user_usecase: Arc<ConnectUserUseCase>,
    /// DisconnectUserUseCase（切断と退出通知）
    pub disconnect_user_usecase: Arc<DisconnectUserUseCase>,
    /// SendMessageUseCase（メッセージの永続化と配信）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// GetRecentMessagesUseCase（履歴取得）
    pub get_recent_messages_usecase: Arc<GetRecentMessagesUseCase>,
    /// GetOnlineUsersUseCase（在室者取得）
    pub get_online_users_usecase: Arc<GetOnlineUsersUseCase>,
    /// CreateSessionUseCase（開発用セッション発行）
    pub create_session_usecase: Arc<CreateSessionUseCase>,
    /// EndSessionUseCase（ログアウト）
    pub end_session_usecase: Arc<EndSessionUseCase>,
}
