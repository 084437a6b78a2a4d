//! Authenticated-session lookup.
//!
//! Login and credential storage belong to an external service; the chat core
//! only asks whether a token maps to an authenticated user.

use async_trait::async_trait;

use super::{
    entity::AuthenticatedUser,
    value_object::{SessionToken, Username},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Resolve a token to the user it was issued for.
    async fn lookup(&self, token: &SessionToken) -> Option<AuthenticatedUser>;
}

/// Issues and ends sessions on behalf of the external login service.
#[async_trait]
pub trait SessionIssuer: Send + Sync {
    async fn issue(&self, username: Username) -> (SessionToken, AuthenticatedUser);

    /// Forget a session. Returns `false` if the token was unknown.
    ///
    /// Sockets already admitted with the token stay connected.
    async fn revoke(&self, token: &SessionToken) -> bool;
}
