//! Driving port for account use-cases.
//!
//! Inbound adapters call this port to register, log in and resolve bearer
//! tokens without importing any outbound infrastructure.

use async_trait::async_trait;

use crate::domain::{
    DisplayName, Error, LoginRequest, RegistrationRequest, SessionToken, User,
};

/// A user together with a freshly issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub user: User,
    pub token: SessionToken,
}

/// Domain use-case port for accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Create an account and issue its first token.
    async fn register(&self, request: RegistrationRequest) -> Result<AuthenticatedSession, Error>;

    /// Exchange credentials for a fresh token.
    async fn login(&self, request: LoginRequest) -> Result<AuthenticatedSession, Error>;

    /// Resolve a bearer token to the account it was issued for.
    async fn authenticate(&self, token: &SessionToken) -> Result<User, Error>;

    /// Change the display name of an authenticated user.
    async fn update_profile(&self, user: &User, display_name: DisplayName)
    -> Result<User, Error>;

    /// Permanently remove an authenticated user's account.
    async fn delete_account(&self, user: &User) -> Result<(), Error>;
}
