//! UseCase layer
//!
//! 接続受付（Session Gate）、切断、メッセージ送信、履歴・在室者の取得、
//! セッションの発行と終了。

pub mod connect_user;
pub mod create_session;
pub mod disconnect_user;
pub mod end_session;
pub mod error;
pub mod get_online_users;
pub mod get_recent_messages;
pub mod presence_lock;
pub mod send_message;

pub use connect_user::ConnectUserUseCase;
pub use create_session::CreateSessionUseCase;
pub use disconnect_user::DisconnectUserUseCase;
pub use end_session::EndSessionUseCase;
pub use error::{ConnectError, SendMessageError};
pub use get_online_users::GetOnlineUsersUseCase;
pub use get_recent_messages::GetRecentMessagesUseCase;
pub use presence_lock::PresenceLock;
pub use send_message::SendMessageUseCase;
